//! The production responder module: accepts selector queries from remote
//! peers and streams matched blocks back to them.
//!
//! It consists of multiple parts:
//! - A control loop task that owns all per-request scheduling state and
//!   serializes every state transition, so no lock is held over the state
//!   map.
//! - A fixed pool of query worker tasks that pop task batches from the
//!   query queue and drive traversals through the query executor.
//! - The query executor, which walks one selector-guided traversal, loading
//!   blocks on demand and streaming each visited block to the requesting
//!   peer's response sender.
//!
//! ### Control loop
//!
//! All mutation of the request-state map flows through one bounded event
//! channel consumed by a single task. Inbound peer batches arrive as
//! `Requests` events; workers claim popped tasks with a `StartQuery`
//! handshake and report outcomes with `FinishQuery`. The loop removes a
//! request's entry at the moment it emits the completion call, which is
//! what makes that call exactly-once even when a cancellation races a
//! natural completion.
//!
//! ### Cancellation
//!
//! Cancelling a queued request removes its task from the queue before any
//! worker sees it: no executor runs and no response or completion is ever
//! sent. Cancelling an active request flips a flag the executor checks
//! between traversal steps, so one response already past its check may
//! still be delivered before the stream ends with a cancelled status.

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use graphweft_api::{
    builder::Builder, BoxFut, DynBlockLoader, DynPeerManager, DynQueryQueue,
    DynResponder, DynResponderFactory, DynSelectorEngine, GraphRequest,
    PeerId, PeerManager, PeerResponseSender, QueryQueue, Responder,
    ResponderFactory, ResponseStatusCode, Task, WeftError, WeftResult,
};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

mod event;
mod query_executor;

use event::*;
use query_executor::QueryExecutor;

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// CoreResponder configuration types.
pub mod config {
    /// Configuration parameters for
    /// [CoreResponderFactory](super::CoreResponderFactory).
    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CoreResponderConfig {
        /// How many query workers run traversals concurrently. This bounds
        /// the number of concurrently-active traversals. Default: 6.
        pub worker_count: usize,
        /// The minimum amount of work a worker asks the queue for in one
        /// pop. Default: 1.
        pub target_min_work: usize,
    }

    impl Default for CoreResponderConfig {
        fn default() -> Self {
            Self {
                worker_count: 6,
                target_min_work: 1,
            }
        }
    }

    /// Module-level configuration for CoreResponder.
    #[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CoreResponderModConfig {
        /// CoreResponder configuration.
        #[serde(default)]
        pub core_responder: CoreResponderConfig,
    }

    impl graphweft_api::config::ModConfig for CoreResponderModConfig {}
}

use config::*;

/// A production-ready responder module.
#[derive(Debug)]
pub struct CoreResponderFactory {}

impl CoreResponderFactory {
    /// Construct a new CoreResponderFactory.
    pub fn create() -> DynResponderFactory {
        Arc::new(Self {})
    }
}

impl ResponderFactory for CoreResponderFactory {
    fn default_config(
        &self,
        config: &mut graphweft_api::config::Config,
    ) -> WeftResult<()> {
        config.set_module_config(&CoreResponderModConfig::default())?;
        Ok(())
    }

    fn create(
        &self,
        builder: Arc<Builder>,
    ) -> BoxFut<'static, WeftResult<DynResponder>> {
        Box::pin(async move {
            let config: CoreResponderModConfig =
                builder.config.get_module_config()?;
            let out: DynResponder = Arc::new(CoreResponder::new(
                config.core_responder,
                builder.loader.clone(),
                builder.selector_engine.clone(),
                builder.peer_manager.clone(),
                builder.query_queue.clone(),
            ));
            Ok(out)
        })
    }
}

/// The running responder: a control loop task plus a pool of query worker
/// tasks. Dropping the instance aborts all of them.
#[derive(Debug)]
pub struct CoreResponder {
    event_tx: mpsc::Sender<Event>,
    tasks: Vec<JoinHandle<()>>,
}

impl CoreResponder {
    /// Construct a responder and start its control loop and query workers.
    pub fn new(
        config: CoreResponderConfig,
        loader: DynBlockLoader,
        selector_engine: DynSelectorEngine,
        peer_manager: DynPeerManager,
        query_queue: DynQueryQueue,
    ) -> Self {
        let (event_tx, event_rx) =
            mpsc::channel::<Event>(EVENT_CHANNEL_CAPACITY);

        let mut tasks = Vec::with_capacity(config.worker_count + 1);
        tasks.push(tokio::task::spawn(Self::control_loop(
            event_rx,
            peer_manager.clone(),
            query_queue.clone(),
        )));

        let executor = Arc::new(QueryExecutor::new(loader, selector_engine));
        for _ in 0..config.worker_count {
            tasks.push(tokio::task::spawn(Self::query_worker(
                event_tx.clone(),
                query_queue.clone(),
                peer_manager.clone(),
                executor.clone(),
                config.target_min_work,
            )));
        }

        Self { event_tx, tasks }
    }

    /// The single writer of the request-state map. Runs until the event
    /// channel closes on shutdown.
    async fn control_loop(
        mut event_rx: mpsc::Receiver<Event>,
        peer_manager: DynPeerManager,
        query_queue: DynQueryQueue,
    ) {
        let mut queries: HashMap<ResponseKey, QueryState> = HashMap::new();

        while let Some(event) = event_rx.recv().await {
            match event {
                Event::Requests { peer, requests } => {
                    for request in requests {
                        Self::apply_request(
                            &mut queries,
                            &query_queue,
                            peer.clone(),
                            request,
                        );
                    }
                }
                Event::StartQuery { key, reply } => {
                    let _ = reply.send(Self::claim_query(&mut queries, &key));
                }
                Event::FinishQuery { key, outcome } => {
                    Self::finish_query(
                        &mut queries,
                        &peer_manager,
                        key,
                        outcome,
                    );
                }
                Event::Synchronize { reply } => {
                    let _ = reply.send(());
                }
            }
        }
    }

    fn apply_request(
        queries: &mut HashMap<ResponseKey, QueryState>,
        query_queue: &DynQueryQueue,
        peer: PeerId,
        request: GraphRequest,
    ) {
        match request {
            GraphRequest::New {
                id,
                root,
                selector,
                priority,
            } => {
                let key = ResponseKey {
                    peer: peer.clone(),
                    request: id,
                };
                if queries.contains_key(&key) {
                    tracing::debug!(%key, "ignoring duplicate request id");
                    return;
                }
                queries.insert(key, QueryState::Queued { root, selector });
                query_queue.push_tasks(peer, vec![Task::new(id, priority)]);
            }
            GraphRequest::Cancel { id } => {
                let key = ResponseKey {
                    peer: peer.clone(),
                    request: id,
                };
                if matches!(
                    queries.get(&key),
                    Some(QueryState::Queued { .. })
                ) {
                    // never picked up: drop the task with no executor and
                    // no completion side effects at all
                    query_queue.remove(id, peer);
                    queries.remove(&key);
                    return;
                }
                match queries.get_mut(&key) {
                    Some(state) => {
                        if let QueryState::Active { cancel } = &*state {
                            cancel.store(true, Ordering::SeqCst);
                            *state = QueryState::Cancelled;
                        }
                        // already cancelled: cancellation is idempotent
                    }
                    None => {
                        tracing::debug!(
                            %key,
                            "cancel for unknown or finished request"
                        );
                    }
                }
            }
        }
    }

    /// A worker claims a popped task. Only a Queued request can become
    /// Active; anything else means the task raced a cancellation and there
    /// is nothing to run.
    fn claim_query(
        queries: &mut HashMap<ResponseKey, QueryState>,
        key: &ResponseKey,
    ) -> Option<ActiveQuery> {
        let state = queries.get_mut(key)?;
        let (root, selector) = match &*state {
            QueryState::Queued { root, selector } => {
                (root.clone(), selector.clone())
            }
            _ => return None,
        };
        let cancel = Arc::new(AtomicBool::new(false));
        *state = QueryState::Active {
            cancel: cancel.clone(),
        };
        Some(ActiveQuery {
            root,
            selector,
            cancel,
        })
    }

    /// Removing the entry and emitting the completion happen together:
    /// whatever is emitted here is the one and only completion call this
    /// request will ever see. A stored cancellation wins over the reported
    /// outcome.
    fn finish_query(
        queries: &mut HashMap<ResponseKey, QueryState>,
        peer_manager: &DynPeerManager,
        key: ResponseKey,
        outcome: QueryOutcome,
    ) {
        let Some(state) = queries.remove(&key) else {
            tracing::debug!(%key, "finish event for untracked query");
            return;
        };
        let sender = peer_manager.sender_for_peer(key.peer.clone());
        match (state, outcome) {
            (QueryState::Cancelled, _) | (_, QueryOutcome::Cancelled) => {
                sender.finish_with_error(
                    key.request,
                    ResponseStatusCode::RequestCancelled,
                );
            }
            (_, QueryOutcome::Completed) => {
                sender.finish_request(key.request);
            }
            (_, QueryOutcome::Errored(status)) => {
                sender.finish_with_error(key.request, status);
            }
        }
    }

    async fn query_worker(
        event_tx: mpsc::Sender<Event>,
        query_queue: DynQueryQueue,
        peer_manager: DynPeerManager,
        executor: Arc<QueryExecutor>,
        target_min_work: usize,
    ) {
        loop {
            let popped = query_queue.pop_tasks(target_min_work).await;
            if popped.tasks.is_empty() {
                continue;
            }
            let sender = peer_manager.sender_for_peer(popped.peer.clone());
            // the whole batch runs before the next pop, preserving the
            // queue's per-pop work grouping
            for task in &popped.tasks {
                let key = ResponseKey {
                    peer: popped.peer.clone(),
                    request: task.topic,
                };
                let (reply_tx, reply_rx) = oneshot::channel();
                if event_tx
                    .send(Event::StartQuery {
                        key: key.clone(),
                        reply: reply_tx,
                    })
                    .await
                    .is_err()
                {
                    return;
                }
                let Ok(claimed) = reply_rx.await else {
                    return;
                };
                if let Some(active) = claimed {
                    let outcome = executor
                        .execute_query(&key, active, sender.clone())
                        .await;
                    if event_tx
                        .send(Event::FinishQuery { key, outcome })
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
                query_queue.tasks_done(
                    popped.peer.clone(),
                    std::slice::from_ref(task),
                );
            }
            query_queue.thaw_round();
        }
    }
}

impl Responder for CoreResponder {
    fn process_requests(
        &self,
        peer: PeerId,
        requests: Vec<GraphRequest>,
    ) -> BoxFut<'_, WeftResult<()>> {
        Box::pin(async move {
            self.event_tx
                .send(Event::Requests { peer, requests })
                .await
                .map_err(|_| {
                    WeftError::other("responder control loop stopped")
                })
        })
    }

    fn synchronize(&self) -> BoxFut<'_, WeftResult<()>> {
        Box::pin(async move {
            let (reply_tx, reply_rx) = oneshot::channel();
            self.event_tx
                .send(Event::Synchronize { reply: reply_tx })
                .await
                .map_err(|_| {
                    WeftError::other("responder control loop stopped")
                })?;
            reply_rx.await.map_err(|_| {
                WeftError::other("responder control loop stopped")
            })
        })
    }
}

impl Drop for CoreResponder {
    fn drop(&mut self) {
        for t in self.tasks.iter() {
            t.abort();
        }
    }
}

#[cfg(test)]
mod test;
