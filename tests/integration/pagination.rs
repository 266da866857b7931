use nexusfs::remote::{MemoryTransport, PagedAssetSource};
use nexusfs::{NexusError, NexusFs, RemoteError};
use std::sync::Arc;

#[tokio::test]
async fn repeated_continuation_token_is_protocol_error() {
    let transport = Arc::new(MemoryTransport::new(1));
    for i in 0..5 {
        transport.insert("repo1", &format!("f{}.txt", i), 1);
    }
    transport.stick_continuation_token("stuck");
    let fs = NexusFs::new("repo1", PagedAssetSource::new(transport.clone()));

    let err = fs.list("", false).await.unwrap_err();
    assert!(matches!(err, NexusError::Protocol(_)), "{err}");
    assert_eq!(transport.stats().paged_queries, 2);
}

#[tokio::test]
async fn page_limit_stops_runaway_listing() {
    let transport = Arc::new(MemoryTransport::new(1));
    for i in 0..5 {
        transport.insert("repo1", &format!("f{}.txt", i), 1);
    }
    let source = PagedAssetSource::new(transport.clone()).with_max_pages(3);
    let fs = NexusFs::new("repo1", source);

    let err = fs.list("", false).await.unwrap_err();
    assert!(matches!(err, NexusError::Protocol(_)));
    assert_eq!(transport.stats().paged_queries, 3);
}

#[tokio::test]
async fn many_pages_are_all_ingested() {
    let transport = Arc::new(MemoryTransport::new(3));
    for i in 0..25 {
        transport.insert("repo1", &format!("dir{}/f{}.txt", i % 4, i), 1);
    }
    let fs = NexusFs::new("repo1", PagedAssetSource::new(transport.clone()));

    assert_eq!(fs.list("", true).await.unwrap().len(), 25);
    assert_eq!(fs.list("", false).await.unwrap().len(), 4);
    assert_eq!(transport.stats().paged_queries, 9);
}

#[tokio::test]
async fn forbidden_listing_fails_and_is_retried_on_next_call() {
    let transport = Arc::new(MemoryTransport::new(2));
    transport.insert("repo1", "a.txt", 1);
    transport.fail_next_query(RemoteError::new(403, "forbidden", "denied").into());
    let fs = NexusFs::new("repo1", PagedAssetSource::new(transport));

    let err = fs.list("", false).await.unwrap_err();
    assert!(!err.is_retryable());
    assert_eq!(fs.list("", false).await.unwrap().len(), 1);
}
