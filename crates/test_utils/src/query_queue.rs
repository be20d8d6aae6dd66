//! A fake query queue with a holdable pop path.

use graphweft_api::{
    BoxFut, PeerId, PoppedTasks, QueryQueue, RequestId, Task,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::{watch, Notify};

/// A [QueryQueue] serving batches strictly in push order, with a switch to
/// hold the pop path closed (so tasks can be cancelled before any worker
/// ever sees them) and counters for fairness-hook assertions.
#[derive(Debug)]
pub struct FakeQueryQueue {
    queries: Mutex<Vec<(PeerId, Vec<Task>)>>,
    notify: Notify,
    hold_tx: watch::Sender<bool>,
    tasks_done_count: AtomicUsize,
    thaw_round_count: AtomicUsize,
}

impl Default for FakeQueryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeQueryQueue {
    /// Construct a new empty queue with the pop path open.
    pub fn new() -> Self {
        let (hold_tx, _) = watch::channel(false);
        Self {
            queries: Mutex::new(Vec::new()),
            notify: Notify::new(),
            hold_tx,
            tasks_done_count: AtomicUsize::new(0),
            thaw_round_count: AtomicUsize::new(0),
        }
    }

    /// Close the pop path: pop_tasks stays pending until released.
    pub fn hold_pop(&self) {
        self.hold_tx.send_replace(true);
    }

    /// Reopen the pop path.
    pub fn release_pop(&self) {
        self.hold_tx.send_replace(false);
    }

    /// How many tasks have been acknowledged done.
    pub fn tasks_done_count(&self) -> usize {
        self.tasks_done_count.load(Ordering::SeqCst)
    }

    /// How many fairness rounds have been thawed.
    pub fn thaw_round_count(&self) -> usize {
        self.thaw_round_count.load(Ordering::SeqCst)
    }
}

impl QueryQueue for FakeQueryQueue {
    fn push_tasks(&self, peer: PeerId, tasks: Vec<Task>) {
        self.queries.lock().unwrap().push((peer, tasks));
        self.notify.notify_one();
    }

    fn pop_tasks(&self, _target_min_work: usize) -> BoxFut<'_, PoppedTasks> {
        Box::pin(async move {
            let mut held = self.hold_tx.subscribe();
            loop {
                while *held.borrow() {
                    held.changed().await.expect("hold switch dropped");
                }
                {
                    let mut queries = self.queries.lock().unwrap();
                    if !queries.is_empty() && !*held.borrow() {
                        let (peer, tasks) = queries.remove(0);
                        if !queries.is_empty() {
                            self.notify.notify_one();
                        }
                        return PoppedTasks {
                            peer,
                            tasks,
                            pending_work: 0,
                        };
                    }
                }
                tokio::select! {
                    _ = self.notify.notified() => {}
                    _ = held.changed() => {}
                }
            }
        })
    }

    fn remove(&self, topic: RequestId, peer: PeerId) {
        let mut queries = self.queries.lock().unwrap();
        for (query_peer, tasks) in queries.iter_mut() {
            if *query_peer == peer {
                tasks.retain(|t| t.topic != topic);
            }
        }
        queries.retain(|(_, tasks)| !tasks.is_empty());
    }

    fn thaw_round(&self) {
        self.thaw_round_count.fetch_add(1, Ordering::SeqCst);
    }

    fn tasks_done(&self, _peer: PeerId, tasks: &[Task]) {
        self.tasks_done_count
            .fetch_add(tasks.len(), Ordering::SeqCst);
    }
}
