use serde::{Deserialize, Serialize};

use super::{vec_vec_graph::VecVecGraph, Distance, Edge, Graph, Vertex, WeightedEdge};

const EARTH_RADIUS_IN_METERS: f64 = 6_371_008.8;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in meters.
    pub fn haversine_distance(&self, other: &Coordinate) -> f64 {
        let latitude_delta = (other.latitude - self.latitude).to_radians();
        let longitude_delta = (other.longitude - self.longitude).to_radians();

        let a = (latitude_delta / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (longitude_delta / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS_IN_METERS * a.sqrt().asin()
    }
}

/// A graph together with the position of its vertices. Graphs read from
/// formats without positions carry no coordinates.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoadGraph {
    graph: VecVecGraph,
    coordinates: Vec<Coordinate>,
}

impl RoadGraph {
    pub fn new(graph: VecVecGraph, coordinates: Vec<Coordinate>) -> RoadGraph {
        RoadGraph { graph, coordinates }
    }

    pub fn from_edges(edges: &[WeightedEdge], coordinates: Vec<Coordinate>) -> RoadGraph {
        let mut graph = VecVecGraph::new(coordinates.len() as u32);
        edges.iter().for_each(|edge| graph.add_edge(edge));
        RoadGraph { graph, coordinates }
    }

    pub fn graph(&self) -> &VecVecGraph {
        &self.graph
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn coordinate(&self, vertex: Vertex) -> Option<&Coordinate> {
        self.coordinates.get(vertex as usize)
    }
}

impl Graph for RoadGraph {
    fn number_of_vertices(&self) -> u32 {
        self.graph.number_of_vertices()
    }

    fn number_of_edges(&self) -> u32 {
        self.graph.number_of_edges()
    }

    fn edges(&self, tail: Vertex) -> Box<dyn ExactSizeIterator<Item = WeightedEdge> + Send + '_> {
        self.graph.edges(tail)
    }

    fn get_weight(&self, edge: &Edge) -> Option<Distance> {
        self.graph.get_weight(edge)
    }
}
