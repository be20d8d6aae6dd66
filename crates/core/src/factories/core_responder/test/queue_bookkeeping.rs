use super::utils::{setup_test, whole_selection_request, TIMEOUT};
use crate::factories::core_responder::config::CoreResponderConfig;
use crate::factories::core_responder::CoreResponder;
use crate::factories::{
    encode_selector, EnumeratedSelectorEngine, MemBlockStore,
};
use graphweft_api::{
    DynQueryQueue, GraphRequest, Link, Priority, Responder,
};
use graphweft_test_utils::block::generate_blocks;
use graphweft_test_utils::id::{random_peer_id, random_request_id};
use graphweft_test_utils::iter_check;
use graphweft_test_utils::peer_manager::FakePeerManager;
use graphweft_test_utils::query_queue::FakeQueryQueue;
use graphweft_test_utils::response_sender::FakePeerResponseSender;
use std::sync::Arc;
use tokio::time::timeout;

#[tokio::test(flavor = "multi_thread")]
async fn queue_bookkeeping_follows_the_task_lifecycle() {
    let mut test = setup_test(false);
    let peer = random_peer_id();
    let request_id = random_request_id();

    test.responder
        .process_requests(
            peer,
            vec![whole_selection_request(&test, request_id)],
        )
        .await
        .unwrap();

    timeout(TIMEOUT, test.receiver.next_completion())
        .await
        .unwrap();

    // the worker acknowledges the task and thaws the round after the batch
    iter_check!({
        if test.queue.tasks_done_count() == 1
            && test.queue.thaw_round_count() >= 1
        {
            break;
        }
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn blocked_peer_does_not_starve_others() {
    let blocks = generate_blocks(5, 20);
    let store = Arc::new(MemBlockStore::default());
    for (link, data) in &blocks {
        store.put(link.clone(), data.clone());
    }
    let links: Vec<Link> =
        blocks.iter().map(|(link, _)| link.clone()).collect();
    let selector = encode_selector(&links);
    let root = links[0].clone();

    // the slow peer's sender never grants a single send
    let (slow_sender, _slow_receiver) = FakePeerResponseSender::gated();
    let (sender, mut receiver) = FakePeerResponseSender::new();
    let slow_peer = random_peer_id();
    let peer = random_peer_id();
    let peer_manager = Arc::new(FakePeerManager::new(sender));
    peer_manager.set_sender(slow_peer.clone(), slow_sender);

    let queue = Arc::new(FakeQueryQueue::new());
    let responder = CoreResponder::new(
        CoreResponderConfig::default(),
        store,
        EnumeratedSelectorEngine::create(),
        peer_manager,
        queue as DynQueryQueue,
    );

    let slow_request = random_request_id();
    responder
        .process_requests(
            slow_peer,
            vec![GraphRequest::new(
                slow_request,
                root.clone(),
                selector.clone(),
                Priority::MAX,
            )],
        )
        .await
        .unwrap();

    let request_id = random_request_id();
    responder
        .process_requests(
            peer,
            vec![GraphRequest::new(
                request_id,
                root,
                selector,
                Priority::MAX,
            )],
        )
        .await
        .unwrap();

    // the stalled traversal pins one worker; the other peer's query must
    // still run to completion
    for (link, data) in &blocks {
        let response =
            timeout(TIMEOUT, receiver.next_response()).await.unwrap();
        assert_eq!(request_id, response.request);
        assert_eq!(*link, response.link);
        assert_eq!(*data, response.data);
    }
    let completion =
        timeout(TIMEOUT, receiver.next_completion()).await.unwrap();
    assert_eq!(request_id, completion.request);
    assert_eq!(None, completion.status);
}
