use super::utils::{setup_test, whole_selection_request, TIMEOUT};
use crate::factories::core_responder::config::CoreResponderConfig;
use crate::factories::core_responder::CoreResponder;
use crate::factories::{encode_selector, EnumeratedSelectorEngine};
use bytes::Bytes;
use graphweft_api::{
    DynQueryQueue, GraphRequest, MockBlockLoader, Priority, Responder,
    ResponseStatusCode, WeftError,
};
use graphweft_test_utils::enable_tracing;
use graphweft_test_utils::id::{
    random_link, random_peer_id, random_request_id,
};
use graphweft_test_utils::peer_manager::FakePeerManager;
use graphweft_test_utils::query_queue::FakeQueryQueue;
use graphweft_test_utils::response_sender::FakePeerResponseSender;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test(flavor = "multi_thread")]
async fn streams_all_blocks_then_finishes() {
    enable_tracing();
    let mut test = setup_test(false);
    let peer = random_peer_id();
    let request_id = random_request_id();

    test.responder
        .process_requests(
            peer.clone(),
            vec![whole_selection_request(&test, request_id)],
        )
        .await
        .unwrap();

    // responses arrive in traversal-visit order
    for (link, data) in &test.blocks {
        let response = timeout(TIMEOUT, test.receiver.next_response())
            .await
            .unwrap();
        assert_eq!(request_id, response.request);
        assert_eq!(*link, response.link);
        assert_eq!(*data, response.data);
    }

    let completion = timeout(TIMEOUT, test.receiver.next_completion())
        .await
        .unwrap();
    assert_eq!(request_id, completion.request);
    assert_eq!(None, completion.status);
    assert_eq!(Some(peer), test.peer_manager.last_peer());
    assert!(test.receiver.try_next_response().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_request_id_is_ignored() {
    let mut test = setup_test(false);
    let peer = random_peer_id();
    let request_id = random_request_id();

    let request = whole_selection_request(&test, request_id);
    test.responder
        .process_requests(peer, vec![request.clone(), request])
        .await
        .unwrap();

    for _ in 0..test.blocks.len() {
        timeout(TIMEOUT, test.receiver.next_response())
            .await
            .unwrap();
    }
    let completion = timeout(TIMEOUT, test.receiver.next_completion())
        .await
        .unwrap();
    assert_eq!(request_id, completion.request);

    // the duplicate entry must not produce a second run of the query
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(test.receiver.try_next_response().is_none());
    assert!(test.receiver.try_next_completion().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_block_fails_with_content_not_found() {
    let mut test = setup_test(false);
    let peer = random_peer_id();
    let request_id = random_request_id();

    // the second link of the selection is not in the store
    let selector =
        encode_selector(&[test.root.clone(), random_link()]);
    test.responder
        .process_requests(
            peer,
            vec![GraphRequest::new(
                request_id,
                test.root.clone(),
                selector,
                Priority::MAX,
            )],
        )
        .await
        .unwrap();

    let response = timeout(TIMEOUT, test.receiver.next_response())
        .await
        .unwrap();
    assert_eq!(test.root, response.link);

    let completion = timeout(TIMEOUT, test.receiver.next_completion())
        .await
        .unwrap();
    assert_eq!(request_id, completion.request);
    assert_eq!(
        Some(ResponseStatusCode::RequestFailedContentNotFound),
        completion.status,
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_selector_fails_the_request() {
    let mut test = setup_test(false);
    let peer = random_peer_id();
    let request_id = random_request_id();

    test.responder
        .process_requests(
            peer,
            vec![GraphRequest::new(
                request_id,
                test.root.clone(),
                Bytes::from_static(&[0xff]),
                Priority::MAX,
            )],
        )
        .await
        .unwrap();

    let completion = timeout(TIMEOUT, test.receiver.next_completion())
        .await
        .unwrap();
    assert_eq!(request_id, completion.request);
    assert_eq!(
        Some(ResponseStatusCode::RequestFailedUnknown),
        completion.status,
    );
    assert!(test.receiver.try_next_response().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn loader_failure_fails_the_request() {
    let (sender, mut receiver) = FakePeerResponseSender::new();
    let mut loader = MockBlockLoader::new();
    loader.expect_load().returning(|_| {
        Box::pin(async { Err(WeftError::other("disk failure")) })
    });
    let queue = Arc::new(FakeQueryQueue::new());
    let responder = CoreResponder::new(
        CoreResponderConfig::default(),
        Arc::new(loader),
        EnumeratedSelectorEngine::create(),
        Arc::new(FakePeerManager::new(sender)),
        queue as DynQueryQueue,
    );

    let peer = random_peer_id();
    let request_id = random_request_id();
    let root = random_link();
    responder
        .process_requests(
            peer,
            vec![GraphRequest::new(
                request_id,
                root.clone(),
                encode_selector(&[root]),
                Priority::MAX,
            )],
        )
        .await
        .unwrap();

    let completion =
        timeout(TIMEOUT, receiver.next_completion()).await.unwrap();
    assert_eq!(request_id, completion.request);
    assert_eq!(
        Some(ResponseStatusCode::RequestFailedUnknown),
        completion.status,
    );
    assert!(receiver.try_next_response().is_none());
}
