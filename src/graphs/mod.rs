use serde::{Deserialize, Serialize};

pub mod graph_factory;
pub mod road_graph;
pub mod vec_vec_graph;

pub type Vertex = u32;
pub type Distance = f64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub tail: Vertex,
    pub head: Vertex,
}

/// A road segment. Segments that are not one-way may be driven in both
/// directions and are stored in the adjacency lists of both endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub tail: Vertex,
    pub head: Vertex,
    pub weight: Distance,
    pub one_way: bool,
}

impl WeightedEdge {
    pub fn one_way(tail: Vertex, head: Vertex, weight: Distance) -> WeightedEdge {
        WeightedEdge {
            tail,
            head,
            weight,
            one_way: true,
        }
    }

    pub fn bidirectional(tail: Vertex, head: Vertex, weight: Distance) -> WeightedEdge {
        WeightedEdge {
            tail,
            head,
            weight,
            one_way: false,
        }
    }

    pub fn remove_weight(&self) -> Edge {
        Edge {
            tail: self.tail,
            head: self.head,
        }
    }

    pub fn remove_tail(&self) -> TaillessEdge {
        TaillessEdge {
            head: self.head,
            weight: self.weight,
            one_way: self.one_way,
        }
    }

    pub fn reversed(&self) -> WeightedEdge {
        WeightedEdge {
            tail: self.head,
            head: self.tail,
            weight: self.weight,
            one_way: self.one_way,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaillessEdge {
    pub head: Vertex,
    pub weight: Distance,
    pub one_way: bool,
}

impl TaillessEdge {
    pub fn set_tail(&self, tail: Vertex) -> WeightedEdge {
        WeightedEdge {
            tail,
            head: self.head,
            weight: self.weight,
            one_way: self.one_way,
        }
    }
}

/// Read-only topology consumed by the searches.
pub trait Graph: Send + Sync {
    fn number_of_vertices(&self) -> u32;

    fn number_of_edges(&self) -> u32 {
        self.vertices()
            .map(|vertex| self.edges(vertex).len() as u32)
            .sum::<u32>()
    }

    fn vertices(&self) -> std::ops::Range<Vertex> {
        0..self.number_of_vertices()
    }

    fn edges(&self, tail: Vertex) -> Box<dyn ExactSizeIterator<Item = WeightedEdge> + Send + '_>;

    fn get_weight(&self, edge: &Edge) -> Option<Distance>;

    /// Sums the weights along `path`, `None` if two consecutive vertices are
    /// not connected.
    fn get_path_distance(&self, path: &[Vertex]) -> Option<Distance> {
        path.windows(2)
            .map(|pair| {
                self.get_weight(&Edge {
                    tail: pair[0],
                    head: pair[1],
                })
            })
            .sum()
    }
}
