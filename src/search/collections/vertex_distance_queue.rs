use std::{cmp::Reverse, collections::BinaryHeap};

use keyed_priority_queue::KeyedPriorityQueue;
use ordered_float::OrderedFloat;

use crate::graphs::{Distance, Vertex};

/// A trait for a priority queue that manages vertices and their distances.
/// This trait is useful for graph algorithms that need to repeatedly retrieve
/// the vertex with the smallest distance (such as Dijkstra's algorithm).
///
/// The implementing structs might or might not use a decrease key operation.
/// Implementations without one may return a vertex more than once, callers
/// skip vertices they already expanded.
pub trait VertexDistanceQueue: Send {
    /// Clears all stored data, preparing for a new search.
    fn clear(&mut self);

    /// Inserts a vertex with its associated distance into the priority queue,
    /// or lowers the distance of a vertex that is already queued.
    fn insert(&mut self, vertex: Vertex, distance: Distance);

    /// Removes and returns the vertex with the smallest distance from the
    /// priority queue or none if the queue is empty.
    fn pop(&mut self) -> Option<Vertex>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A priority queue implementation using a Binary Heap.
#[derive(Default)]
pub struct VertexDistanceQueueBinaryHeap {
    heap: BinaryHeap<Reverse<(OrderedFloat<Distance>, Vertex)>>,
}

impl VertexDistanceQueueBinaryHeap {
    pub fn new() -> Self {
        VertexDistanceQueueBinaryHeap {
            heap: BinaryHeap::new(),
        }
    }
}

impl VertexDistanceQueue for VertexDistanceQueueBinaryHeap {
    fn clear(&mut self) {
        self.heap.clear();
    }

    fn insert(&mut self, vertex: Vertex, distance: Distance) {
        self.heap.push(Reverse((OrderedFloat(distance), vertex)));
    }

    fn pop(&mut self) -> Option<Vertex> {
        let Reverse((_distance, vertex)) = self.heap.pop()?;

        Some(vertex)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// A priority queue with a real decrease key operation. Every vertex is
/// contained at most once.
pub struct VertexDistanceQueueKeyed {
    queue: KeyedPriorityQueue<Vertex, Reverse<OrderedFloat<Distance>>>,
}

impl VertexDistanceQueueKeyed {
    pub fn new() -> Self {
        VertexDistanceQueueKeyed {
            queue: KeyedPriorityQueue::new(),
        }
    }
}

impl Default for VertexDistanceQueueKeyed {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexDistanceQueue for VertexDistanceQueueKeyed {
    fn clear(&mut self) {
        self.queue = KeyedPriorityQueue::new();
    }

    fn insert(&mut self, vertex: Vertex, distance: Distance) {
        let priority = Reverse(OrderedFloat(distance));
        match self.queue.get_priority(&vertex) {
            // a larger priority is a smaller distance
            Some(current) if *current >= priority => {}
            _ => {
                self.queue.push(vertex, priority);
            }
        }
    }

    fn pop(&mut self) -> Option<Vertex> {
        let (vertex, _distance) = self.queue.pop()?;

        Some(vertex)
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}
