//! Peer-aware priority task queue types.

use crate::{BoxFut, PeerId, Priority, RequestId};
use std::sync::Arc;

/// One schedulable unit of work: a single request pending in the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// The request this task runs, used as the removal topic.
    pub topic: RequestId,

    /// Scheduling priority relative to the same peer's other tasks.
    pub priority: Priority,

    /// The amount of work this task represents for fairness accounting.
    pub work: usize,
}

impl Task {
    /// Construct a unit-work task for a request.
    pub fn new(topic: RequestId, priority: Priority) -> Self {
        Self {
            topic,
            priority,
            work: 1,
        }
    }
}

/// A batch of tasks popped for a single peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoppedTasks {
    /// The peer the batch belongs to.
    pub peer: PeerId,

    /// The tasks to run, in queue order.
    pub tasks: Vec<Task>,

    /// Work still queued for this peer after the pop.
    pub pending_work: usize,
}

/// The peer-aware priority queue multiplexing request work across peers.
///
/// The queue's internal fairness algorithm (round thawing, per-peer
/// weighting) is its own concern; the responder only depends on this
/// contract. Implementations are responsible for their own concurrency
/// safety under multiple concurrent workers.
pub trait QueryQueue: 'static + Send + Sync + std::fmt::Debug {
    /// Enqueue work items for a peer.
    fn push_tasks(&self, peer: PeerId, tasks: Vec<Task>);

    /// Pop a batch of at least `target_min_work` work (where available) for
    /// the highest-priority eligible peer. The returned future stays pending
    /// while no work is ready; it never resolves to an empty batch while the
    /// queue is operating.
    fn pop_tasks(&self, target_min_work: usize) -> BoxFut<'_, PoppedTasks>;

    /// Remove a still-queued task by request-id topic for a peer. No-op if
    /// absent or already popped.
    fn remove(&self, topic: RequestId, peer: PeerId);

    /// Advance the queue's internal round-robin fairness state.
    fn thaw_round(&self);

    /// Acknowledge completion of popped tasks for fairness accounting.
    fn tasks_done(&self, peer: PeerId, tasks: &[Task]);
}

/// Trait-object [QueryQueue].
pub type DynQueryQueue = Arc<dyn QueryQueue>;
