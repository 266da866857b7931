use chrono::{TimeZone, Utc};
use nexusfs::tree::{TreeCache, TreeMaterializer};
use nexusfs::{AssetDescriptor, CacheKey, Checksum};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn descriptor(index: usize, path: &str) -> AssetDescriptor {
    AssetDescriptor {
        id: format!("id{:04}", index),
        repository: "repo1".to_string(),
        path: path.to_string(),
        checksum: Checksum::default(),
        size: Some(index as u64),
        last_modified: None,
        download_url: String::new(),
    }
}

fn build(assets: &[AssetDescriptor]) -> TreeCache {
    let built_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut materializer = TreeMaterializer::new("repo1", built_at);
    for asset in assets {
        materializer.ingest(asset.clone());
    }
    materializer.finish()
}

/// Paths whose directory segments never collide with file names.
fn asset_path() -> impl Strategy<Value = String> {
    (prop::collection::vec(0u8..3, 0..4), 0u8..5).prop_map(|(dirs, file)| {
        let mut segments: Vec<String> = dirs.iter().map(|d| format!("d{}", d)).collect();
        segments.push(format!("f{}.txt", file));
        segments.join("/")
    })
}

fn listing() -> impl Strategy<Value = (Vec<AssetDescriptor>, Vec<AssetDescriptor>)> {
    prop::collection::vec(asset_path(), 0..40).prop_flat_map(|paths| {
        let assets: Vec<AssetDescriptor> = paths
            .iter()
            .enumerate()
            .map(|(i, path)| descriptor(i, path))
            .collect();
        (Just(assets.clone()), Just(assets).prop_shuffle())
    })
}

/// Paths whose file name may reuse a directory segment, so one key can be
/// both a file and a directory.
fn clashing_path() -> impl Strategy<Value = String> {
    (prop::collection::vec(0u8..2, 0..3), prop::bool::ANY, 0u8..2).prop_map(
        |(dirs, as_dir_name, file)| {
            let mut segments: Vec<String> = dirs.iter().map(|d| format!("d{}", d)).collect();
            if as_dir_name {
                segments.push(format!("d{}", file));
            } else {
                segments.push(format!("f{}.txt", file));
            }
            segments.join("/")
        },
    )
}

fn clashing_listing() -> impl Strategy<Value = (Vec<AssetDescriptor>, Vec<AssetDescriptor>)> {
    prop::collection::vec(clashing_path(), 0..30).prop_flat_map(|paths| {
        let assets: Vec<AssetDescriptor> = paths
            .iter()
            .enumerate()
            .map(|(i, path)| descriptor(i, path))
            .collect();
        (Just(assets.clone()), Just(assets).prop_shuffle())
    })
}

/// Every proper prefix of an asset path, qualified with the repository.
fn implied_directories(assets: &[AssetDescriptor]) -> BTreeSet<String> {
    let mut dirs = BTreeSet::new();
    for asset in assets {
        let segments: Vec<&str> = asset.path.split('/').collect();
        for end in 1..segments.len() {
            dirs.insert(format!("repo1/{}", segments[..end].join("/")));
        }
    }
    dirs
}

proptest! {
    #[test]
    fn directory_wins_over_file_in_any_order((ordered, shuffled) in clashing_listing()) {
        let forward = build(&ordered);
        let backward = build(&shuffled);
        prop_assert_eq!(&forward, &backward);
        prop_assert!(forward.verify().is_empty(), "{:?}", forward.verify());

        let dirs = implied_directories(&ordered);
        for dir in &dirs {
            prop_assert!(forward.get_directory(&CacheKey::new(dir)).is_some(), "{} not a directory", dir);
        }
        let expected: BTreeSet<String> = ordered
            .iter()
            .map(|a| format!("repo1/{}", a.path))
            .filter(|key| !dirs.contains(key))
            .collect();
        let found: BTreeSet<String> = forward
            .files_under(forward.root())
            .unwrap()
            .iter()
            .map(|f| f.key.to_string())
            .collect();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn tree_independent_of_arrival_order((ordered, shuffled) in listing()) {
        prop_assert_eq!(build(&ordered), build(&shuffled));
    }

    #[test]
    fn every_node_reachable_from_root((assets, _) in listing()) {
        let cache = build(&assets);
        let violations = cache.verify();
        prop_assert!(violations.is_empty(), "{:?}", violations);
    }

    #[test]
    fn recursive_listing_covers_every_distinct_path((assets, _) in listing()) {
        let cache = build(&assets);
        let expected: BTreeSet<String> =
            assets.iter().map(|a| format!("repo1/{}", a.path)).collect();
        let found: BTreeSet<String> = cache
            .files_under(cache.root())
            .unwrap()
            .iter()
            .map(|f| f.key.to_string())
            .collect();
        prop_assert_eq!(found, expected);
        prop_assert_eq!(cache.file_count(), cache.files_under(cache.root()).unwrap().len());
    }

    #[test]
    fn duplicate_paths_resolve_to_greatest_id((assets, shuffled) in listing()) {
        let cache = build(&shuffled);
        for asset in &assets {
            let file = cache
                .get_file(&CacheKey::for_asset("repo1", &asset.path))
                .unwrap();
            prop_assert!(file.asset_id >= asset.id);
        }
    }

    #[test]
    fn children_listed_once((assets, _) in listing()) {
        let cache = build(&assets);
        for (key, node) in cache.iter() {
            if node.is_directory() {
                let children = cache.children(key).unwrap();
                let unique: BTreeSet<&CacheKey> = children.iter().map(|c| c.key()).collect();
                prop_assert_eq!(unique.len(), children.len());
            }
        }
    }
}
