use indicatif::ParallelProgressIterator;
use rand::{seq::IteratorRandom, Rng};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    graphs::{vec_vec_graph::VecVecGraph, Distance, Graph, Vertex},
    search::{dijkstra::dijkstra_one_to_all_wrapped, DistanceHeuristic},
    utility::get_progressbar,
};

pub struct Landmarks {
    pub landmarks: Vec<Landmark>,
}

impl Landmarks {
    pub fn new(graph: &dyn Graph, vertices: &[Vertex]) -> Landmarks {
        let reversed_graph = VecVecGraph::reversed(graph);

        let landmarks = vertices
            .par_iter()
            .progress_with(get_progressbar(
                "Generating landmarks",
                vertices.len() as u64,
            ))
            .map(|&vertex| Landmark::new(graph, &reversed_graph, vertex))
            .collect();

        Landmarks { landmarks }
    }

    pub fn random<R: Rng>(graph: &dyn Graph, number_of_landmarks: u32, rng: &mut R) -> Landmarks {
        let vertices = graph
            .vertices()
            .choose_multiple(rng, number_of_landmarks as usize);
        Landmarks::new(graph, &vertices)
    }
}

impl DistanceHeuristic for Landmarks {
    fn lower_bound(&self, source: Vertex, target: Vertex) -> Distance {
        self.landmarks
            .iter()
            .map(|landmark| landmark.lower_bound(source, target))
            .fold(0.0, Distance::max)
    }
}

pub struct Landmark {
    pub vertex: Vertex,
    pub distance_to: Vec<Distance>,
    pub distance_from: Vec<Distance>,
}

impl Landmark {
    /// `reversed_graph` must be the reverse of `graph`.
    pub fn new(graph: &dyn Graph, reversed_graph: &dyn Graph, vertex: Vertex) -> Self {
        Landmark {
            vertex,
            distance_to: dijkstra_one_to_all_wrapped(graph, vertex),
            distance_from: dijkstra_one_to_all_wrapped(reversed_graph, vertex),
        }
    }
}

impl DistanceHeuristic for Landmark {
    fn lower_bound(&self, source: Vertex, target: Vertex) -> Distance {
        // Unreachable entries are infinite and give no bound.
        let difference = |minuend: Distance, subtrahend: Distance| {
            let difference = minuend - subtrahend;
            if difference.is_finite() {
                difference.max(0.0)
            } else {
                0.0
            }
        };

        let potential_forward = difference(
            self.distance_to[target as usize],
            self.distance_to[source as usize],
        );
        let potential_backward = difference(
            self.distance_from[source as usize],
            self.distance_from[target as usize],
        );

        potential_forward.max(potential_backward)
    }
}
