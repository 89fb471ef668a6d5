use serde::{Deserialize, Serialize};

use crate::graphs::{Distance, Vertex};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub vertices: Vec<Vertex>,
    pub distance: Distance,
}

/// Represents a request for finding a shortest path in a graph.
///
/// This struct is used to encapsulate the information required to find a path
/// from a source vertex to a target vertex in a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPathRequest {
    pub source: Vertex,
    pub target: Vertex,
}

/// The result of one request, compared against the exact distance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShortestPathTestCase {
    pub request: ShortestPathRequest,
    pub distance: Option<Distance>,
    pub exact_distance: Option<Distance>,
    pub timing_in_seconds: f64,
}

impl ShortestPathTestCase {
    /// Relative excess of the found distance over the exact one.
    pub fn gap(&self) -> Option<f64> {
        let distance = self.distance?;
        let exact_distance = self.exact_distance?;
        if exact_distance == 0.0 {
            return Some(0.0);
        }
        Some((distance - exact_distance) / exact_distance)
    }
}
