use tracing::{debug, trace};

use super::{
    coordinator::{Coordinator, Meeting, StartClaim},
    notifier::ResultNotifier,
    Direction, WorkerOutcome,
};
use crate::{
    graphs::{Distance, Graph, Vertex},
    search::{collections::vertex_distance_queue::VertexDistanceQueue, DistanceHeuristic},
};

/// What a single worker searches for.
pub struct WorkerConfig {
    pub name: String,
    pub direction: Direction,
    pub start: Vertex,
    /// Start vertex of the opposite direction, the goal of the heuristic.
    pub target: Vertex,
    pub queue: Box<dyn VertexDistanceQueue>,
}

/// Read only inputs and shared coordination objects of one query.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub graph: &'a dyn Graph,
    pub heuristic: &'a dyn DistanceHeuristic,
    pub heuristic_scale: f64,
    pub coordinator: &'a Coordinator,
    pub notifier: &'a ResultNotifier,
}

pub struct SearchWorker<'a> {
    config: WorkerConfig,
    context: SearchContext<'a>,
}

// Reports to the notifier when dropped, also while unwinding.
struct Completion<'a> {
    notifier: &'a ResultNotifier,
    outcome: WorkerOutcome,
}

impl Drop for Completion<'_> {
    fn drop(&mut self) {
        self.notifier.complete(self.outcome);
    }
}

impl<'a> SearchWorker<'a> {
    pub fn new(config: WorkerConfig, context: SearchContext<'a>) -> Self {
        SearchWorker { config, context }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn direction(&self) -> Direction {
        self.config.direction
    }

    /// Runs the search loop to completion and reports the outcome to the
    /// notifier exactly once.
    pub fn run(mut self) -> WorkerOutcome {
        let mut completion = Completion {
            notifier: self.context.notifier,
            outcome: WorkerOutcome::Cancelled,
        };

        completion.outcome = self.search();
        debug!(worker = %self.config.name, outcome = ?completion.outcome, "worker terminated");
        completion.outcome
    }

    fn potential(&self, vertex: Vertex) -> Distance {
        let estimate = self
            .context
            .heuristic
            .lower_bound(vertex, self.config.target)
            * self.context.heuristic_scale;

        if estimate.is_finite() {
            estimate
        } else {
            0.0
        }
    }

    fn search(&mut self) -> WorkerOutcome {
        let context = self.context;
        let direction = self.config.direction;
        let target = self.config.target;

        {
            let mut state = context.coordinator.lock();
            match state.claim_start(direction, self.config.start, target) {
                StartClaim::Claimed => self.config.queue.insert(self.config.start, 0.0),
                StartClaim::Met => return WorkerOutcome::Met,
                // the other worker settles our start as its target
                StartClaim::Reached => return WorkerOutcome::NoPathFound,
                StartClaim::Cancelled => return WorkerOutcome::Cancelled,
            }
        }

        while !self.config.queue.is_empty() {
            if context.coordinator.is_finished() {
                return WorkerOutcome::Cancelled;
            }

            let Some(current) = self.config.queue.pop() else {
                break;
            };

            {
                let mut state = context.coordinator.lock();
                if state.is_finished() {
                    return WorkerOutcome::Cancelled;
                }
                if state.store().is_closed(current) {
                    continue;
                }

                let reached_target = current == target;
                if reached_target || state.store().distance(current) == Distance::INFINITY {
                    if reached_target && state.store().predecessor(current).is_some() {
                        state.finish_direct_hit(current);
                        return WorkerOutcome::DirectHit;
                    }
                    return WorkerOutcome::NoPathFound;
                }

                state.store_mut().close(current);
            }

            let potential_current = self.potential(current);
            for edge in context.graph.edges(current) {
                if !direction.may_traverse(&edge) {
                    continue;
                }
                let weight = edge.weight - potential_current + self.potential(edge.head);

                let mut state = context.coordinator.lock();
                match state.detect_and_stitch(direction, Some(current), edge.head) {
                    Meeting::Apart => {}
                    Meeting::Stitched | Meeting::AlreadyFinished => return WorkerOutcome::Met,
                }
                if state.is_finished() {
                    return WorkerOutcome::Cancelled;
                }
                if state.store().is_closed(edge.head) {
                    continue;
                }

                if let Some(distance) =
                    state.store_mut().relax(direction, current, edge.head, weight)
                {
                    trace!(
                        worker = %self.config.name,
                        tail = current,
                        head = edge.head,
                        distance,
                        "relaxed"
                    );
                    self.config.queue.insert(edge.head, distance);
                }
            }
        }

        WorkerOutcome::NoPathFound
    }
}
