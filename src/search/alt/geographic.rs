use crate::{
    graphs::{road_graph::Coordinate, Distance, Vertex},
    search::DistanceHeuristic,
};

/// Straight line distance between the coordinates of two vertices, scaled to
/// the unit of the edge weights. Vertices without a coordinate get no bound.
pub struct GeographicHeuristic<'a> {
    coordinates: &'a [Coordinate],
    weight_per_meter: f64,
}

impl<'a> GeographicHeuristic<'a> {
    pub fn new(coordinates: &'a [Coordinate], weight_per_meter: f64) -> Self {
        GeographicHeuristic {
            coordinates,
            weight_per_meter,
        }
    }
}

impl<'a> DistanceHeuristic for GeographicHeuristic<'a> {
    fn lower_bound(&self, source: Vertex, target: Vertex) -> Distance {
        match (
            self.coordinates.get(source as usize),
            self.coordinates.get(target as usize),
        ) {
            (Some(source), Some(target)) => {
                source.haversine_distance(target) * self.weight_per_meter
            }
            _ => 0.0,
        }
    }
}
