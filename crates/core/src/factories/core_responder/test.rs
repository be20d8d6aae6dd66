mod incoming_query;
mod queue_bookkeeping;

pub(crate) mod utils {
    use crate::factories::core_responder::config::CoreResponderConfig;
    use crate::factories::core_responder::CoreResponder;
    use crate::factories::{
        encode_selector, EnumeratedSelectorEngine, MemBlockStore,
    };
    use bytes::Bytes;
    use graphweft_api::{DynQueryQueue, GraphRequest, Link, Priority};
    use graphweft_test_utils::block::generate_blocks;
    use graphweft_test_utils::peer_manager::FakePeerManager;
    use graphweft_test_utils::query_queue::FakeQueryQueue;
    use graphweft_test_utils::response_sender::{
        FakePeerResponseSender, FakeSenderReceiver,
    };
    use std::sync::Arc;
    use std::time::Duration;

    pub const TIMEOUT: Duration = Duration::from_secs(1);

    pub struct TestCase {
        pub responder: CoreResponder,
        pub receiver: FakeSenderReceiver,
        pub queue: Arc<FakeQueryQueue>,
        pub peer_manager: Arc<FakePeerManager>,
        pub blocks: Vec<(Link, Bytes)>,
        pub root: Link,
        pub selector: Bytes,
    }

    /// Five 20-byte blocks in a mem store, an enumerated selector over all
    /// of them, a fake queue and a fake sender behind a fake peer manager.
    pub fn setup_test(gated_sender: bool) -> TestCase {
        let blocks = generate_blocks(5, 20);
        let store = Arc::new(MemBlockStore::default());
        for (link, data) in &blocks {
            store.put(link.clone(), data.clone());
        }
        let links: Vec<Link> =
            blocks.iter().map(|(link, _)| link.clone()).collect();
        let selector = encode_selector(&links);
        let root = links[0].clone();

        let (sender, receiver) = if gated_sender {
            FakePeerResponseSender::gated()
        } else {
            FakePeerResponseSender::new()
        };
        let queue = Arc::new(FakeQueryQueue::new());
        let peer_manager = Arc::new(FakePeerManager::new(sender));
        let responder = CoreResponder::new(
            CoreResponderConfig::default(),
            store.clone(),
            EnumeratedSelectorEngine::create(),
            peer_manager.clone(),
            queue.clone() as DynQueryQueue,
        );

        TestCase {
            responder,
            receiver,
            queue,
            peer_manager,
            blocks,
            root,
            selector,
        }
    }

    /// A request over the whole generated selection at maximum priority.
    pub fn whole_selection_request(
        test: &TestCase,
        id: graphweft_api::RequestId,
    ) -> GraphRequest {
        GraphRequest::new(
            id,
            test.root.clone(),
            test.selector.clone(),
            Priority::MAX,
        )
    }
}
