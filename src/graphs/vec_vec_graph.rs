use serde::{Deserialize, Serialize};

use super::{Distance, Edge, Graph, TaillessEdge, Vertex, WeightedEdge};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VecVecGraph {
    edges: Vec<Vec<TaillessEdge>>,
}

impl VecVecGraph {
    pub fn new(number_of_vertices: u32) -> VecVecGraph {
        VecVecGraph {
            edges: vec![Vec::new(); number_of_vertices as usize],
        }
    }

    pub fn from_edges(edges: &[WeightedEdge]) -> VecVecGraph {
        let mut graph = VecVecGraph::default();
        edges.iter().for_each(|edge| graph.add_edge(edge));
        graph
    }

    /// Adds `edge`, mirroring it into the head's adjacency list if it is not
    /// one-way.
    pub fn add_edge(&mut self, edge: &WeightedEdge) {
        if edge.tail == edge.head {
            return;
        }

        self.set_edge(edge);
        if !edge.one_way {
            self.set_edge(&edge.reversed());
        }
    }

    /// Returns a graph with every adjacency reversed. One-way flags are kept.
    pub fn reversed(graph: &dyn Graph) -> VecVecGraph {
        let mut reversed = VecVecGraph::new(graph.number_of_vertices());
        for vertex in graph.vertices() {
            for edge in graph.edges(vertex) {
                reversed.set_edge(&edge.reversed());
            }
        }
        reversed
    }

    fn set_edge(&mut self, edge: &WeightedEdge) {
        // Ensure the edge endpoints is within the bounds of self.edges.
        let max_edge_endpoints = std::cmp::max(edge.tail, edge.head) as usize;
        if max_edge_endpoints >= self.edges.len() {
            self.edges.resize(max_edge_endpoints + 1, Vec::new());
        }

        let edges_sharing_tail = &mut self.edges[edge.tail as usize];

        match edges_sharing_tail.binary_search_by_key(&edge.head, |other| other.head) {
            Ok(index) => {
                let existing = &mut edges_sharing_tail[index];
                if edge.weight < existing.weight {
                    *existing = edge.remove_tail();
                } else if edge.weight == existing.weight && !edge.one_way {
                    existing.one_way = false;
                }
            }
            Err(index) => edges_sharing_tail.insert(index, edge.remove_tail()),
        }
    }
}

impl Graph for VecVecGraph {
    fn number_of_vertices(&self) -> u32 {
        self.edges.len() as u32
    }

    fn number_of_edges(&self) -> u32 {
        self.edges.iter().map(Vec::len).sum::<usize>() as u32
    }

    fn edges(&self, tail: Vertex) -> Box<dyn ExactSizeIterator<Item = WeightedEdge> + Send + '_> {
        // Struct is needed as tail would otherwise not live long enough.
        struct EdgeIterator<'a> {
            edge_iter: std::slice::Iter<'a, TaillessEdge>,
            tail: Vertex,
        }

        impl<'a> Iterator for EdgeIterator<'a> {
            type Item = WeightedEdge;

            fn next(&mut self) -> Option<Self::Item> {
                self.edge_iter
                    .next()
                    .map(|tailless_edge| tailless_edge.set_tail(self.tail))
            }
        }

        impl<'a> ExactSizeIterator for EdgeIterator<'a> {
            fn len(&self) -> usize {
                self.edge_iter.len()
            }
        }

        let edge_iter = match self.edges.get(tail as usize) {
            Some(edges) => edges.iter(),
            None => [].iter(),
        };

        Box::new(EdgeIterator { edge_iter, tail })
    }

    fn get_weight(&self, edge: &Edge) -> Option<Distance> {
        let edges_sharing_tail = self.edges.get(edge.tail as usize)?;

        let edge_index = edges_sharing_tail
            .binary_search_by_key(&edge.head, |tailless_edge| tailless_edge.head)
            .ok()?;

        Some(edges_sharing_tail[edge_index].weight)
    }
}
