use nexusfs::remote::{MemoryTransport, PagedAssetSource};
use nexusfs::{DirEntry, NexusFs, UploadRequest};
use std::sync::Arc;

fn repository() -> Arc<MemoryTransport> {
    let transport = Arc::new(MemoryTransport::new(2));
    transport.insert("maven-releases", "a/b/c.txt", 3);
    transport.insert("maven-releases", "a/d.txt", 4);
    transport.insert("maven-releases", "a/b/e.txt", 5);
    transport
}

fn sorted_paths(entries: &[DirEntry]) -> Vec<String> {
    let mut paths: Vec<String> = entries.iter().map(|e| e.path().to_string()).collect();
    paths.sort();
    paths
}

#[tokio::test]
async fn lists_synthesized_directories_level_by_level() {
    let transport = repository();
    let fs = NexusFs::new("maven-releases", PagedAssetSource::new(transport.clone()));

    let top = fs.list("", false).await.unwrap();
    assert_eq!(sorted_paths(&top), vec!["a"]);
    assert!(top[0].is_directory());

    let a = fs.list("a", false).await.unwrap();
    assert_eq!(sorted_paths(&a), vec!["a/b", "a/d.txt"]);

    let b = fs.list("a/b", false).await.unwrap();
    assert_eq!(sorted_paths(&b), vec!["a/b/c.txt", "a/b/e.txt"]);
    let sizes: Vec<u64> = b
        .iter()
        .filter_map(|e| e.as_object())
        .map(|o| o.size)
        .collect();
    assert_eq!(sizes.iter().sum::<u64>(), 8);

    assert_eq!(fs.materializations(), 1);
}

#[tokio::test]
async fn directory_mod_time_is_pass_time() {
    let transport = repository();
    let fs = NexusFs::new("maven-releases", PagedAssetSource::new(transport));
    let before = chrono::Utc::now();
    let entries = fs.list("", false).await.unwrap();
    let after = chrono::Utc::now();
    let mod_time = entries[0].mod_time();
    assert!(mod_time >= before && mod_time <= after);
}

#[tokio::test]
async fn write_invalidates_only_its_repository() {
    let transport = repository();
    transport.insert("npm-proxy", "lodash/-/lodash-4.17.21.tgz", 10);
    let fs = NexusFs::new("", PagedAssetSource::new(transport.clone()));

    fs.list("maven-releases", true).await.unwrap();
    fs.list("npm-proxy", true).await.unwrap();
    assert_eq!(fs.materializations(), 2);

    fs.put(
        "maven-releases/a/new.txt",
        UploadRequest::new(b"new".to_vec()),
    )
    .await
    .unwrap();

    fs.list("npm-proxy", true).await.unwrap();
    assert_eq!(fs.materializations(), 2);

    let entries = fs.list("maven-releases/a", false).await.unwrap();
    assert_eq!(
        sorted_paths(&entries),
        vec![
            "maven-releases/a/b",
            "maven-releases/a/d.txt",
            "maven-releases/a/new.txt"
        ]
    );
    assert_eq!(fs.materializations(), 3);
}

#[tokio::test]
async fn unknown_repository_surfaces_remote_error() {
    let transport = repository();
    let fs = NexusFs::new("", PagedAssetSource::new(transport));
    let err = fs.list("missing", false).await.unwrap_err();
    assert!(matches!(err, nexusfs::NexusError::Remote(ref e) if e.status == 404));
}
