use super::event::{ActiveQuery, QueryOutcome, ResponseKey};
use graphweft_api::{
    BlockLoader, DynBlockLoader, DynPeerResponseSender, DynSelectorEngine,
    PeerResponseSender, ResponseStatusCode, SelectorEngine, Traversal,
};
use std::sync::atomic::Ordering;

/// Drives one selector traversal to completion, pulling blocks via the
/// loader and pushing each visited block to the peer's response sender.
#[derive(Debug)]
pub(super) struct QueryExecutor {
    loader: DynBlockLoader,
    selector_engine: DynSelectorEngine,
}

impl QueryExecutor {
    pub(super) fn new(
        loader: DynBlockLoader,
        selector_engine: DynSelectorEngine,
    ) -> Self {
        Self {
            loader,
            selector_engine,
        }
    }

    /// Run one claimed query.
    ///
    /// The cancellation flag is consulted between traversal steps only, so
    /// one response already past its check may still go out after a cancel
    /// lands, never more.
    pub(super) async fn execute_query(
        &self,
        key: &ResponseKey,
        query: ActiveQuery,
        sender: DynPeerResponseSender,
    ) -> QueryOutcome {
        let mut traversal = match self
            .selector_engine
            .compile(query.root.clone(), query.selector.clone())
        {
            Ok(traversal) => traversal,
            Err(err) => {
                tracing::warn!(%key, ?err, "could not compile selector");
                return QueryOutcome::Errored(
                    ResponseStatusCode::RequestFailedUnknown,
                );
            }
        };

        while let Some(link) = traversal.next_link() {
            if query.cancel.load(Ordering::SeqCst) {
                return QueryOutcome::Cancelled;
            }

            let data = match self.loader.load(link.clone()).await {
                Ok(Some(data)) => data,
                Ok(None) => {
                    return QueryOutcome::Errored(
                        ResponseStatusCode::RequestFailedContentNotFound,
                    );
                }
                Err(err) => {
                    tracing::warn!(%key, %link, ?err, "block load failed");
                    return QueryOutcome::Errored(
                        ResponseStatusCode::RequestFailedUnknown,
                    );
                }
            };

            sender
                .send_response(key.request, link.clone(), data.clone())
                .await;

            if let Err(err) = traversal.advance(&link, &data) {
                tracing::warn!(%key, %link, ?err, "traversal failed to advance");
                return QueryOutcome::Errored(
                    ResponseStatusCode::RequestFailedUnknown,
                );
            }
        }

        QueryOutcome::Completed
    }
}
