use fixedbitset::FixedBitSet;

use crate::{
    graphs::{Distance, Vertex},
    search::bidirectional::Direction,
};

/// Mutable search state of every vertex, shared by the forward and the
/// backward search. Both directions write the same distance and predecessor
/// fields; the touched flags remember which direction reached a vertex.
pub struct NodeStore {
    distances: Vec<Distance>,
    predecessors: Vec<Vertex>,
    closed: FixedBitSet,
    touched_forward: FixedBitSet,
    touched_backward: FixedBitSet,
}

impl NodeStore {
    pub fn new(number_of_vertices: u32) -> Self {
        let number_of_vertices = number_of_vertices as usize;
        NodeStore {
            distances: vec![Distance::INFINITY; number_of_vertices],
            predecessors: vec![Vertex::MAX; number_of_vertices],
            closed: FixedBitSet::with_capacity(number_of_vertices),
            touched_forward: FixedBitSet::with_capacity(number_of_vertices),
            touched_backward: FixedBitSet::with_capacity(number_of_vertices),
        }
    }

    pub fn number_of_vertices(&self) -> u32 {
        self.distances.len() as u32
    }

    pub fn distance(&self, vertex: Vertex) -> Distance {
        self.distances[vertex as usize]
    }

    pub fn set_distance(&mut self, vertex: Vertex, distance: Distance) {
        self.distances[vertex as usize] = distance;
    }

    pub fn predecessor(&self, vertex: Vertex) -> Option<Vertex> {
        let predecessor = self.predecessors[vertex as usize];

        if predecessor == Vertex::MAX {
            return None;
        }

        Some(predecessor)
    }

    pub fn set_predecessor(&mut self, vertex: Vertex, predecessor: Option<Vertex>) {
        self.predecessors[vertex as usize] = predecessor.unwrap_or(Vertex::MAX);
    }

    pub fn is_closed(&self, vertex: Vertex) -> bool {
        self.closed.contains(vertex as usize)
    }

    pub fn close(&mut self, vertex: Vertex) {
        self.closed.insert(vertex as usize);
    }

    pub fn is_touched(&self, vertex: Vertex, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.touched_forward.contains(vertex as usize),
            Direction::Backward => self.touched_backward.contains(vertex as usize),
        }
    }

    pub fn touch(&mut self, vertex: Vertex, direction: Direction) {
        match direction {
            Direction::Forward => self.touched_forward.insert(vertex as usize),
            Direction::Backward => self.touched_backward.insert(vertex as usize),
        }
    }

    /// Relaxes the edge `tail -> head` with its (possibly heuristic adjusted)
    /// weight. Returns the new distance of `head` if it improved.
    pub fn relax(
        &mut self,
        direction: Direction,
        tail: Vertex,
        head: Vertex,
        weight: Distance,
    ) -> Option<Distance> {
        let alternative_distance = self.distance(tail) + weight;
        if alternative_distance < self.distance(head) {
            self.set_distance(head, alternative_distance);
            self.set_predecessor(head, Some(tail));
            self.touch(head, direction);
            return Some(alternative_distance);
        }

        None
    }

    /// Follows the predecessor chain starting at `head`. Returns `None` if
    /// the chain contains a cycle.
    pub fn chain(&self, head: Vertex) -> Option<Vec<Vertex>> {
        let mut vertices = vec![head];

        let mut current = head;
        while let Some(predecessor) = self.predecessor(current) {
            if vertices.len() > self.distances.len() {
                return None;
            }
            vertices.push(predecessor);
            current = predecessor;
        }

        Some(vertices)
    }
}
