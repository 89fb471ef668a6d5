//! Bidirectional goal directed search on two threads.
//!
//! A forward worker grows a search tree from the source and a backward worker
//! grows one from the target. Both share a single [`coordinator::Coordinator`]
//! and stop as soon as one of them relaxes an edge into a vertex the other
//! direction already reached, or reaches its own goal by itself. The first
//! meeting wins, so the returned path is not guaranteed to be optimal.

use std::thread::{self, Scope, ScopedJoinHandle};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use self::{
    coordinator::{Coordinator, SearchState},
    notifier::ResultNotifier,
    worker::{SearchContext, SearchWorker, WorkerConfig},
};
use super::{
    collections::vertex_distance_queue::{
        VertexDistanceQueue, VertexDistanceQueueBinaryHeap, VertexDistanceQueueKeyed,
    },
    path::Path,
    DistanceHeuristic, PathFinding,
};
use crate::{
    error::SearchError,
    graphs::{Graph, Vertex, WeightedEdge},
};

pub mod coordinator;
pub mod notifier;
pub mod worker;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// The backward search walks out edges as well, so it may only use
    /// segments that can be driven in both directions.
    pub fn may_traverse(self, edge: &WeightedEdge) -> bool {
        match self {
            Direction::Forward => true,
            Direction::Backward => !edge.one_way,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerOutcome {
    /// Reached its own goal without meeting the other direction.
    DirectHit,
    /// Detected a meeting of both search trees.
    Met,
    /// Ran out of reachable vertices.
    NoPathFound,
    /// Stopped because the other worker already finished the search.
    Cancelled,
}

impl WorkerOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, WorkerOutcome::DirectHit | WorkerOutcome::Met)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum QueueKind {
    /// Priority queue with decrease key.
    #[default]
    Keyed,
    /// Binary heap with lazy deletion.
    BinaryHeap,
}

impl QueueKind {
    pub fn create(self) -> Box<dyn VertexDistanceQueue> {
        match self {
            QueueKind::Keyed => Box::new(VertexDistanceQueueKeyed::new()),
            QueueKind::BinaryHeap => Box::new(VertexDistanceQueueBinaryHeap::new()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub queue: QueueKind,
    /// Factor applied to every heuristic estimate.
    pub heuristic_scale: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            queue: QueueKind::default(),
            heuristic_scale: 1.0,
        }
    }
}

/// Everything known about one finished query.
#[derive(Clone, Debug, Serialize)]
pub struct SearchReport {
    pub path: Option<Path>,
    pub forward: WorkerOutcome,
    pub backward: WorkerOutcome,
    /// Vertex at which the search trees met, if they did.
    pub meeting: Option<Vertex>,
    pub completed: u32,
    pub notifications: u32,
}

pub struct BidirectionalSearch<'a> {
    graph: &'a dyn Graph,
    heuristic: &'a dyn DistanceHeuristic,
    config: SearchConfig,
}

impl<'a> BidirectionalSearch<'a> {
    pub fn new(graph: &'a dyn Graph, heuristic: &'a dyn DistanceHeuristic) -> Self {
        Self::with_config(graph, heuristic, SearchConfig::default())
    }

    pub fn with_config(
        graph: &'a dyn Graph,
        heuristic: &'a dyn DistanceHeuristic,
        config: SearchConfig,
    ) -> Self {
        BidirectionalSearch {
            graph,
            heuristic,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs one query and blocks until both workers terminated.
    pub fn search(&self, source: Vertex, target: Vertex) -> Result<SearchReport, SearchError> {
        let number_of_vertices = self.graph.number_of_vertices();
        for vertex in [source, target] {
            if vertex >= number_of_vertices {
                return Err(SearchError::VertexOutOfRange {
                    vertex,
                    number_of_vertices,
                });
            }
        }

        let coordinator = Coordinator::new(number_of_vertices);
        let notifier = ResultNotifier::new();
        let context = SearchContext {
            graph: self.graph,
            heuristic: self.heuristic,
            heuristic_scale: self.config.heuristic_scale,
            coordinator: &coordinator,
            notifier: &notifier,
        };

        let forward = SearchWorker::new(
            WorkerConfig {
                name: format!("forward {}->{}", source, target),
                direction: Direction::Forward,
                start: source,
                target,
                queue: self.config.queue.create(),
            },
            context,
        );
        let backward = SearchWorker::new(
            WorkerConfig {
                name: format!("backward {}->{}", target, source),
                direction: Direction::Backward,
                start: target,
                target: source,
                queue: self.config.queue.create(),
            },
            context,
        );
        let forward_name = forward.name().to_string();
        let backward_name = backward.name().to_string();

        let (forward_outcome, backward_outcome) = thread::scope(|scope| -> Result<_, SearchError> {
            let forward_handle = spawn_worker(scope, forward)?;
            let backward_handle = match spawn_worker(scope, backward) {
                Ok(handle) => handle,
                Err(error) => {
                    coordinator.cancel();
                    // a panic is logged by join_worker, the spawn error wins
                    let _ = join_worker(forward_handle, forward_name);
                    return Err(SearchError::Spawn(error));
                }
            };

            let success = notifier.wait();
            debug!(source, target, success, "caller woken");

            let forward_outcome = join_worker(forward_handle, forward_name);
            let backward_outcome = join_worker(backward_handle, backward_name);
            let forward_outcome = forward_outcome?;
            let backward_outcome = backward_outcome?;

            Ok((forward_outcome, backward_outcome))
        })?;

        let state = coordinator.into_state();
        let path = state
            .path_head()
            .and_then(|head| self.materialize(&state, head, source, target));

        let report = SearchReport {
            path,
            forward: forward_outcome,
            backward: backward_outcome,
            meeting: state.meeting(),
            completed: notifier.completed(),
            notifications: notifier.notifications(),
        };
        info!(
            source,
            target,
            forward = ?report.forward,
            backward = ?report.backward,
            meeting = ?report.meeting,
            distance = ?report.path.as_ref().map(|path| path.distance),
            "search finished"
        );

        Ok(report)
    }

    /// Like [`BidirectionalSearch::search`] but only returns the path.
    pub fn find_path(&self, source: Vertex, target: Vertex) -> Result<Path, SearchError> {
        self.search(source, target)?
            .path
            .ok_or(SearchError::NoPathFound {
                from: source,
                target,
            })
    }

    // The stitched chain runs from the start of one direction to the start of
    // the other. Its stored distances are reduced by the heuristic, so the
    // cost is summed from the graph.
    fn materialize(
        &self,
        state: &SearchState,
        head: Vertex,
        source: Vertex,
        target: Vertex,
    ) -> Option<Path> {
        let Some(mut vertices) = state.store().chain(head) else {
            warn!(head, "predecessor chain contains a cycle");
            return None;
        };

        if vertices.first() != Some(&source) {
            vertices.reverse();
        }
        if vertices.first() != Some(&source) || vertices.last() != Some(&target) {
            warn!(source, target, ?vertices, "chain does not connect source and target");
            return None;
        }

        let Some(distance) = self.graph.get_path_distance(&vertices) else {
            warn!(source, target, "chain uses a missing edge");
            return None;
        };

        Some(Path { vertices, distance })
    }
}

impl<'a> PathFinding for BidirectionalSearch<'a> {
    fn shortest_path(&self, source: Vertex, target: Vertex) -> Option<Path> {
        match self.find_path(source, target) {
            Ok(path) => Some(path),
            Err(error) => {
                debug!(%error, "no path");
                None
            }
        }
    }
}

// A panicking worker is logged here, whether or not its error is returned.
fn join_worker(
    handle: ScopedJoinHandle<'_, WorkerOutcome>,
    name: String,
) -> Result<WorkerOutcome, SearchError> {
    handle.join().map_err(|_| {
        warn!(worker = %name, "search worker panicked");
        SearchError::WorkerPanicked { name }
    })
}

fn spawn_worker<'scope, 'env, 'w: 'scope>(
    scope: &'scope Scope<'scope, 'env>,
    worker: SearchWorker<'w>,
) -> std::io::Result<ScopedJoinHandle<'scope, WorkerOutcome>> {
    thread::Builder::new()
        .name(worker.name().to_string())
        .spawn_scoped(scope, move || worker.run())
}
