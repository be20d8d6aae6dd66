//! A peer-fair in-memory query queue.

use graphweft_api::{
    BoxFut, DynQueryQueue, PeerId, PoppedTasks, QueryQueue, RequestId, Task,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A [QueryQueue] that round-robins between peers with pending work and
/// orders tasks by priority within a peer.
///
/// The contract's fairness hooks are accepted but keep no state here: this
/// queue never freezes peers, so [thaw_round](QueryQueue::thaw_round) and
/// [tasks_done](QueryQueue::tasks_done) have nothing to account for.
#[derive(Debug, Default)]
pub struct MemQueryQueue {
    inner: Mutex<Inner>,
    notify: Notify,
}

#[derive(Debug, Default)]
struct Inner {
    /// Rotation of peers with queued work. A peer is present exactly when
    /// its entry in `by_peer` is non-empty.
    rotation: VecDeque<PeerId>,
    by_peer: HashMap<PeerId, Vec<Task>>,
}

impl MemQueryQueue {
    /// Construct a new empty queue as a trait object.
    pub fn create() -> DynQueryQueue {
        Arc::new(Self::default())
    }

    fn try_pop(&self, target_min_work: usize) -> Option<PoppedTasks> {
        let mut guard = self.inner.lock().unwrap();
        let inner = &mut *guard;
        let peer = inner.rotation.pop_front()?;
        let mut queue = inner.by_peer.remove(&peer)?;

        let mut tasks = Vec::new();
        let mut work = 0;
        while work < target_min_work.max(1) && !queue.is_empty() {
            let task = queue.remove(0);
            work += task.work;
            tasks.push(task);
        }

        let pending_work = queue.iter().map(|t| t.work).sum();
        if !queue.is_empty() {
            inner.by_peer.insert(peer.clone(), queue);
            inner.rotation.push_back(peer.clone());
        }
        Some(PoppedTasks {
            peer,
            tasks,
            pending_work,
        })
    }
}

impl QueryQueue for MemQueryQueue {
    fn push_tasks(&self, peer: PeerId, tasks: Vec<Task>) {
        if tasks.is_empty() {
            return;
        }
        {
            let mut guard = self.inner.lock().unwrap();
            let inner = &mut *guard;
            let queue = inner.by_peer.entry(peer.clone()).or_default();
            let was_empty = queue.is_empty();
            for task in tasks {
                // stable priority order, highest first
                let at =
                    queue.partition_point(|t| t.priority >= task.priority);
                queue.insert(at, task);
            }
            if was_empty {
                inner.rotation.push_back(peer);
            }
        }
        self.notify.notify_one();
    }

    fn pop_tasks(&self, target_min_work: usize) -> BoxFut<'_, PoppedTasks> {
        Box::pin(async move {
            loop {
                if let Some(popped) = self.try_pop(target_min_work) {
                    // more batches may be ready; chain the wakeup so idle
                    // workers are not left behind a single stored permit
                    if !self.inner.lock().unwrap().rotation.is_empty() {
                        self.notify.notify_one();
                    }
                    return popped;
                }
                self.notify.notified().await;
            }
        })
    }

    fn remove(&self, topic: RequestId, peer: PeerId) {
        let mut guard = self.inner.lock().unwrap();
        let inner = &mut *guard;
        if let Some(queue) = inner.by_peer.get_mut(&peer) {
            queue.retain(|t| t.topic != topic);
            if queue.is_empty() {
                inner.by_peer.remove(&peer);
                inner.rotation.retain(|p| *p != peer);
            }
        }
    }

    fn thaw_round(&self) {}

    fn tasks_done(&self, _peer: PeerId, _tasks: &[Task]) {}
}
