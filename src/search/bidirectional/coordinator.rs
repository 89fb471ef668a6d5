use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use super::Direction;
use crate::{graphs::Vertex, search::collections::node_store::NodeStore};

/// Result of checking a relaxed vertex for a meeting of both frontiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Meeting {
    /// The vertex was not reached by the other direction.
    Apart,
    /// The frontiers met and this call stitched both chains.
    Stitched,
    /// The frontiers met but the search was already finished.
    AlreadyFinished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartClaim {
    Claimed,
    /// Source and target coincide and the other direction already claimed
    /// it.
    Met,
    /// The other direction relaxed its way to the start vertex first. It will
    /// settle it as its own target.
    Reached,
    Cancelled,
}

/// Everything both workers share. Only accessible through
/// [`Coordinator::lock`].
pub struct SearchState {
    store: NodeStore,
    finished: bool,
    path_head: Option<Vertex>,
    meeting: Option<Vertex>,
    stitches: u32,
}

impl SearchState {
    fn new(number_of_vertices: u32) -> Self {
        SearchState {
            store: NodeStore::new(number_of_vertices),
            finished: false,
            path_head: None,
            meeting: None,
            stitches: 0,
        }
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut NodeStore {
        &mut self.store
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// First vertex of the predecessor chain holding the result, if any.
    pub fn path_head(&self) -> Option<Vertex> {
        self.path_head
    }

    pub fn meeting(&self) -> Option<Vertex> {
        self.meeting
    }

    pub fn stitches(&self) -> u32 {
        self.stitches
    }

    /// Sets up the start vertex of `direction`, whose search heads for
    /// `target`. A start vertex already reached by the other direction is
    /// only a meeting if it is the target as well.
    pub fn claim_start(
        &mut self,
        direction: Direction,
        start: Vertex,
        target: Vertex,
    ) -> StartClaim {
        if self.finished {
            return StartClaim::Cancelled;
        }

        if self.store.is_touched(start, direction.opposite()) {
            if start != target {
                debug!(?direction, start, "start already reached by the other direction");
                return StartClaim::Reached;
            }
            if self.detect_and_stitch(direction, None, start) != Meeting::Apart {
                return StartClaim::Met;
            }
        }

        self.store.set_distance(start, 0.0);
        self.store.touch(start, direction);
        StartClaim::Claimed
    }

    /// Checks whether `successor` was reached by the direction opposite to
    /// `direction`. The first meeting of a search flips it to finished and
    /// reverses the predecessor chain of `successor` in place so that it
    /// continues through `current`. Afterwards one chain leads from the start
    /// of the other direction to the start of `direction`.
    pub fn detect_and_stitch(
        &mut self,
        direction: Direction,
        current: Option<Vertex>,
        successor: Vertex,
    ) -> Meeting {
        if !self.store.is_touched(successor, direction.opposite()) {
            return Meeting::Apart;
        }

        if self.finished {
            return Meeting::AlreadyFinished;
        }

        self.finished = true;
        self.meeting = Some(successor);
        self.stitches += 1;

        let mut previous = current;
        let mut vertex = Some(successor);
        while let Some(this) = vertex {
            vertex = self.store.predecessor(this);
            self.store.set_predecessor(this, previous);
            previous = Some(this);
        }
        self.path_head = previous;

        debug!(?direction, ?current, successor, path_head = ?self.path_head, "stitched chains");
        Meeting::Stitched
    }

    /// Records that a direction reached its target by itself. Returns false
    /// if the search was already finished.
    pub fn finish_direct_hit(&mut self, target: Vertex) -> bool {
        if self.finished {
            return false;
        }

        self.finished = true;
        self.path_head = Some(target);
        true
    }

    pub fn cancel(&mut self) {
        self.finished = true;
    }
}

/// Owns the shared search state of one query behind a single lock.
pub struct Coordinator {
    state: Mutex<SearchState>,
}

impl Coordinator {
    pub fn new(number_of_vertices: u32) -> Self {
        Coordinator {
            state: Mutex::new(SearchState::new(number_of_vertices)),
        }
    }

    /// Enters the critical section.
    pub fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock()
    }

    pub fn is_finished(&self) -> bool {
        self.state.lock().is_finished()
    }

    /// Makes every worker stop at its next check without producing a path.
    pub fn cancel(&self) {
        self.state.lock().cancel();
    }

    pub fn into_state(self) -> SearchState {
        self.state.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Barrier, thread};

    use super::{Coordinator, Meeting, StartClaim};
    use crate::search::bidirectional::Direction;

    // forward: 0 <- 1 <- 2, backward: 5 <- 4 <- 3
    fn two_chains() -> Coordinator {
        let coordinator = Coordinator::new(6);
        {
            let mut state = coordinator.lock();
            let store = state.store_mut();
            for (vertex, predecessor) in [(1, 0), (2, 1)] {
                store.set_predecessor(vertex, Some(predecessor));
            }
            for (vertex, predecessor) in [(4, 5), (3, 4)] {
                store.set_predecessor(vertex, Some(predecessor));
            }
            for vertex in 0..3 {
                store.touch(vertex, Direction::Forward);
            }
            for vertex in 3..6 {
                store.touch(vertex, Direction::Backward);
            }
        }
        coordinator
    }

    #[test]
    fn forward_meeting_stitches_towards_source() {
        let coordinator = two_chains();
        let mut state = coordinator.lock();

        assert_eq!(state.detect_and_stitch(Direction::Forward, Some(2), 1), Meeting::Apart);
        assert_eq!(state.detect_and_stitch(Direction::Forward, Some(2), 3), Meeting::Stitched);
        assert!(state.is_finished());
        assert_eq!(state.meeting(), Some(3));
        assert_eq!(state.path_head(), Some(5));
        assert_eq!(state.store().chain(5), Some(vec![5, 4, 3, 2, 1, 0]));
    }

    #[test]
    fn backward_meeting_stitches_towards_target() {
        let coordinator = two_chains();
        let mut state = coordinator.lock();

        assert_eq!(state.detect_and_stitch(Direction::Backward, Some(3), 2), Meeting::Stitched);
        assert_eq!(state.path_head(), Some(0));
        assert_eq!(state.store().chain(0), Some(vec![0, 1, 2, 3, 4, 5]));
    }

    #[test]
    fn second_meeting_does_not_stitch() {
        let coordinator = two_chains();
        let mut state = coordinator.lock();

        assert_eq!(state.detect_and_stitch(Direction::Forward, Some(2), 3), Meeting::Stitched);
        assert_eq!(
            state.detect_and_stitch(Direction::Backward, Some(3), 2),
            Meeting::AlreadyFinished
        );
        assert_eq!(state.stitches(), 1);
        assert_eq!(state.store().chain(5), Some(vec![5, 4, 3, 2, 1, 0]));
    }

    #[test]
    fn start_reached_by_other_direction_is_left_alone() {
        let coordinator = two_chains();
        let mut state = coordinator.lock();

        // vertex 3 was reached by the backward direction
        assert_eq!(state.claim_start(Direction::Forward, 3, 5), StartClaim::Reached);
        assert!(!state.is_finished());
        assert_eq!(state.meeting(), None);
        assert_eq!(state.stitches(), 0);
        assert!(!state.store().is_touched(3, Direction::Forward));
        assert_eq!(state.store().chain(3), Some(vec![3, 4, 5]));
    }

    #[test]
    fn shared_start_and_target_meet_at_claim() {
        let coordinator = Coordinator::new(2);
        let mut state = coordinator.lock();

        assert_eq!(state.claim_start(Direction::Forward, 1, 1), StartClaim::Claimed);
        assert_eq!(state.claim_start(Direction::Backward, 1, 1), StartClaim::Met);
        assert_eq!(state.meeting(), Some(1));
        assert_eq!(state.path_head(), Some(1));
        assert_eq!(state.store().chain(1), Some(vec![1]));
        assert_eq!(state.claim_start(Direction::Backward, 0, 1), StartClaim::Cancelled);
    }

    #[test]
    fn claim_fresh_start() {
        let coordinator = Coordinator::new(2);
        let mut state = coordinator.lock();

        assert_eq!(state.claim_start(Direction::Backward, 1, 0), StartClaim::Claimed);
        assert_eq!(state.store().distance(1), 0.0);
        assert!(state.store().is_touched(1, Direction::Backward));
        assert!(!state.is_finished());
    }

    #[test]
    fn direct_hit_only_once() {
        let coordinator = Coordinator::new(3);
        let mut state = coordinator.lock();

        assert!(state.finish_direct_hit(2));
        assert!(!state.finish_direct_hit(1));
        assert_eq!(state.path_head(), Some(2));
    }

    #[test]
    fn racing_meetings_finish_exactly_once() {
        const THREADS: u32 = 8;

        for _ in 0..50 {
            let coordinator = Coordinator::new(2 * THREADS);
            {
                let mut state = coordinator.lock();
                for vertex in 0..THREADS {
                    state.store_mut().touch(vertex, Direction::Forward);
                    state.store_mut().touch(THREADS + vertex, Direction::Backward);
                }
            }
            let barrier = Barrier::new(THREADS as usize);

            let meetings: Vec<Meeting> = thread::scope(|scope| {
                let handles: Vec<_> = (0..THREADS)
                    .map(|index| {
                        let coordinator = &coordinator;
                        let barrier = &barrier;
                        scope.spawn(move || {
                            barrier.wait();
                            if index % 2 == 0 {
                                coordinator.lock().detect_and_stitch(
                                    Direction::Forward,
                                    Some(index),
                                    THREADS + index,
                                )
                            } else {
                                coordinator.lock().detect_and_stitch(
                                    Direction::Backward,
                                    Some(THREADS + index),
                                    index,
                                )
                            }
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap())
                    .collect()
            });

            let stitched = meetings
                .iter()
                .filter(|&&meeting| meeting == Meeting::Stitched)
                .count();
            assert_eq!(stitched, 1);
            assert!(meetings.iter().all(|&meeting| meeting != Meeting::Apart));

            let state = coordinator.into_state();
            assert!(state.is_finished());
            assert_eq!(state.stitches(), 1);
        }
    }
}
