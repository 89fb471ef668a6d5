use super::{
    bidirectional::Direction,
    collections::{
        node_store::NodeStore,
        vertex_distance_queue::{VertexDistanceQueue, VertexDistanceQueueBinaryHeap},
    },
    path::Path,
    PathFinding,
};
use crate::graphs::{Distance, Graph, Vertex};

/// Plain single direction Dijkstra over the out edges of a graph. Serves as
/// the exact reference for the bidirectional search.
pub struct Dijkstra<'a> {
    graph: &'a dyn Graph,
}

impl<'a> Dijkstra<'a> {
    pub fn new(graph: &'a dyn Graph) -> Self {
        Dijkstra { graph }
    }
}

impl<'a> PathFinding for Dijkstra<'a> {
    fn shortest_path(&self, source: Vertex, target: Vertex) -> Option<Path> {
        dijkstra_one_to_one_wrapped(self.graph, source, target)
    }
}

/// Settles vertices in order of distance until `target` is settled or every
/// reachable vertex is.
fn settle(
    graph: &dyn Graph,
    store: &mut NodeStore,
    queue: &mut dyn VertexDistanceQueue,
    source: Vertex,
    target: Option<Vertex>,
) {
    store.set_distance(source, 0.0);
    queue.insert(source, 0.0);

    while let Some(tail) = queue.pop() {
        if store.is_closed(tail) {
            continue;
        }
        store.close(tail);
        if Some(tail) == target {
            break;
        }

        for edge in graph.edges(tail) {
            if store.relax(Direction::Forward, tail, edge.head, edge.weight).is_some() {
                queue.insert(edge.head, store.distance(edge.head));
            }
        }
    }
}

pub fn dijkstra_one_to_all(
    graph: &dyn Graph,
    store: &mut NodeStore,
    queue: &mut dyn VertexDistanceQueue,
    source: Vertex,
) {
    settle(graph, store, queue, source, None);
}

pub fn dijkstra_one_to_one(
    graph: &dyn Graph,
    store: &mut NodeStore,
    queue: &mut dyn VertexDistanceQueue,
    source: Vertex,
    target: Vertex,
) {
    settle(graph, store, queue, source, Some(target));
}

/// Distances from `source` to every vertex, infinite if unreachable.
pub fn dijkstra_one_to_all_wrapped(graph: &dyn Graph, source: Vertex) -> Vec<Distance> {
    let mut store = NodeStore::new(graph.number_of_vertices());
    let mut queue = VertexDistanceQueueBinaryHeap::new();

    dijkstra_one_to_all(graph, &mut store, &mut queue, source);

    graph.vertices().map(|vertex| store.distance(vertex)).collect()
}

pub fn dijkstra_one_to_one_wrapped(
    graph: &dyn Graph,
    source: Vertex,
    target: Vertex,
) -> Option<Path> {
    let mut store = NodeStore::new(graph.number_of_vertices());
    let mut queue = VertexDistanceQueueBinaryHeap::new();

    dijkstra_one_to_one(graph, &mut store, &mut queue, source, target);

    let distance = store.distance(target);
    if distance == Distance::INFINITY {
        return None;
    }
    let mut vertices = store.chain(target)?;
    vertices.reverse();

    Some(Path { vertices, distance })
}
