use nexusfs::remote::{MemoryTransport, PagedAssetSource};
use nexusfs::{NexusFs, UploadRequest};
use std::sync::Arc;
use std::time::Duration;

fn slow_repository() -> Arc<MemoryTransport> {
    let transport = MemoryTransport::new(2).with_latency(Duration::from_millis(20));
    for i in 0..6 {
        transport.insert("repo1", &format!("dir{}/file{}.bin", i % 2, i), 1);
    }
    Arc::new(transport)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_listings_share_one_pass() {
    let transport = slow_repository();
    let fs = Arc::new(NexusFs::new(
        "repo1",
        PagedAssetSource::new(transport.clone()),
    ));

    let mut handles = vec![];
    for i in 0..16 {
        let fs = fs.clone();
        handles.push(tokio::spawn(async move {
            let dir = if i % 2 == 0 { "dir0" } else { "" };
            fs.list(dir, false).await
        }));
    }
    for handle in handles {
        assert!(!handle.await.unwrap().unwrap().is_empty());
    }

    assert_eq!(fs.materializations(), 1);
    assert_eq!(transport.stats().paged_queries, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn write_triggers_exactly_one_new_pass() {
    let transport = slow_repository();
    let fs = Arc::new(NexusFs::new(
        "repo1",
        PagedAssetSource::new(transport.clone()),
    ));
    fs.list("", true).await.unwrap();

    fs.put("dir0/extra.bin", UploadRequest::new(vec![0u8; 8]))
        .await
        .unwrap();

    let mut handles = vec![];
    for _ in 0..8 {
        let fs = fs.clone();
        handles.push(tokio::spawn(async move { fs.list("", true).await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().len(), 7);
    }
    assert_eq!(fs.materializations(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn repositories_materialize_independently() {
    let transport = MemoryTransport::new(5).with_latency(Duration::from_millis(10));
    transport.insert("left", "a.txt", 1);
    transport.insert("right", "b/c.txt", 1);
    let transport = Arc::new(transport);
    let fs = Arc::new(NexusFs::new("", PagedAssetSource::new(transport)));

    let left = {
        let fs = fs.clone();
        tokio::spawn(async move { fs.list("left", false).await })
    };
    let right = {
        let fs = fs.clone();
        tokio::spawn(async move { fs.list("right", false).await })
    };
    assert_eq!(left.await.unwrap().unwrap()[0].path(), "left/a.txt");
    assert_eq!(right.await.unwrap().unwrap()[0].path(), "right/b");
    assert_eq!(fs.materializations(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn write_during_pass_is_visible_afterwards() {
    let transport = MemoryTransport::new(2).with_latency(Duration::from_millis(50));
    for i in 0..6 {
        transport.insert("repo1", &format!("dir0/file{}.bin", i), 1);
    }
    let transport = Arc::new(transport);
    let fs = Arc::new(NexusFs::new(
        "repo1",
        PagedAssetSource::new(transport.clone()),
    ));

    let slow = {
        let fs = fs.clone();
        tokio::spawn(async move { fs.list("dir0", false).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    fs.put("dir0/late.bin", UploadRequest::new(vec![1, 2, 3]))
        .await
        .unwrap();
    slow.await.unwrap().unwrap();

    let entries = fs.list("dir0", false).await.unwrap();
    assert!(entries.iter().any(|e| e.path() == "dir0/late.bin"));
    assert_eq!(entries.len(), 7);
    assert_eq!(fs.materializations(), 2);
}
