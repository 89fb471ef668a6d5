use path::Path;

use crate::graphs::{Distance, Vertex};

pub mod alt;
pub mod bidirectional;
pub mod collections;
pub mod dijkstra;
pub mod path;

/// Estimate of the distance between two vertices used to steer a search
/// towards its target.
pub trait DistanceHeuristic: Send + Sync {
    fn lower_bound(&self, _source: Vertex, _target: Vertex) -> Distance {
        0.0
    }
}

pub trait PathFinding: Send + Sync {
    fn shortest_path(&self, source: Vertex, target: Vertex) -> Option<Path>;

    fn shortest_path_distance(&self, source: Vertex, target: Vertex) -> Option<Distance> {
        self.shortest_path(source, target).map(|path| path.distance)
    }
}

pub struct TrivialHeuristic {}

impl DistanceHeuristic for TrivialHeuristic {}
