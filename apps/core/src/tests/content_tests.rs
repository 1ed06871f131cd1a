//! Content Loading Tests
//!
//! Loading the data directory from disk: required files, optional tier file,
//! lazy fallback and consistency reporting.

use super::shipped_paths;
use crate::error::AppError;
use crate::fs_manager::ContentPaths;
use crate::whisper::content::LOWEST_PRIORITY_TIER;
use crate::whisper::fallback::default_whisper;
use crate::whisper::ContentStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const ALIASES: &str = r#"{"Money": ["money", "rent"], "Love": ["love"]}"#;
const WHISPERS: &str = r#"{
    "Money": [{"mirror": "m", "whisper_start": "s", "blurred_reveal": "r", "encouragement": "e"}],
    "Love": []
}"#;

fn write_data_dir(dir: &Path, aliases: &str, whispers: &str) -> ContentPaths {
    let paths = ContentPaths::in_dir(dir);
    fs::write(&paths.alias_map, aliases).expect("write aliases");
    fs::write(&paths.whispers, whispers).expect("write whispers");
    paths
}

#[test]
fn test_shipped_content_is_consistent() {
    let store = ContentStore::load(&shipped_paths()).expect("shipped content should load");
    let report = store.report();

    assert!(report.is_consistent(), "shipped content report: {report:?}");
    assert!(store.aliases.len() >= 10);
    assert!(store.pool.whisper_count() >= store.aliases.len());
}

#[test]
fn test_load_minimal_directory() {
    let dir = tempdir().expect("temp dir");
    let paths = write_data_dir(dir.path(), ALIASES, WHISPERS);

    let store = ContentStore::load(&paths).expect("minimal content should load");
    assert_eq!(store.aliases.len(), 2);
    assert_eq!(store.pool.whisper_count(), 1);

    // Empty pools are a request-time condition, reported but not rejected.
    assert_eq!(store.report().empty_pools, vec!["Love".to_string()]);
}

#[test]
fn test_missing_alias_map_fails_load() {
    let dir = tempdir().expect("temp dir");
    let paths = ContentPaths::in_dir(dir.path());
    fs::write(&paths.whispers, WHISPERS).expect("write whispers");

    let err = ContentStore::load(&paths).unwrap_err();
    assert!(matches!(err, AppError::ContentSource(_)));
}

#[test]
fn test_malformed_whisper_records_are_skipped() {
    let dir = tempdir().expect("temp dir");
    let paths = write_data_dir(
        dir.path(),
        ALIASES,
        r#"{
            "Money": [
                {"mirror": "only one part"},
                {"mirror": "m", "whisper_start": "s", "blurred_reveal": "r", "encouragement": "e"}
            ],
            "Love": [{"mirror": "l", "whisper_start": "s", "blurred_reveal": "r", "encouragement": "e"}]
        }"#,
    );

    let store = ContentStore::load(&paths).expect("one bad record should not fail the load");
    assert_eq!(store.pool.whisper_count(), 2);

    let report = store.report();
    assert_eq!(report.malformed_whispers, 1);
    assert!(!report.is_consistent());
}

#[test]
fn test_malformed_whispers_file_fails_load() {
    let dir = tempdir().expect("temp dir");
    let paths = write_data_dir(dir.path(), ALIASES, r#"["not", "a", "map"]"#);

    let err = ContentStore::load(&paths).unwrap_err();
    assert!(matches!(err, AppError::ContentSource(_)));
    assert!(err.to_string().contains("whispers.json"));
}

#[test]
fn test_alias_file_order_is_kept() {
    let dir = tempdir().expect("temp dir");
    let paths = write_data_dir(
        dir.path(),
        r#"{"Zeta": ["storm"], "Alpha": ["storm"]}"#,
        r#"{"Zeta": [], "Alpha": []}"#,
    );

    let store = ContentStore::load(&paths).unwrap();
    let order: Vec<&str> = store.aliases.categories().collect();
    assert_eq!(order, vec!["Zeta", "Alpha"]);
}

#[test]
fn test_builtin_tiers_without_tier_file() {
    let dir = tempdir().expect("temp dir");
    let paths = write_data_dir(dir.path(), ALIASES, WHISPERS);

    let store = ContentStore::load(&paths).unwrap();
    assert_eq!(store.tiers.tier_of("Money"), 3);
    assert_eq!(store.tiers.tier_of("Love"), 2);
}

#[test]
fn test_tier_file_overrides_builtin() {
    let dir = tempdir().expect("temp dir");
    let paths = write_data_dir(dir.path(), ALIASES, WHISPERS);
    fs::write(&paths.tiers, r#"{"Money": 1}"#).unwrap();

    let store = ContentStore::load(&paths).unwrap();
    assert_eq!(store.tiers.tier_of("Money"), 1);
    assert_eq!(store.tiers.tier_of("Love"), LOWEST_PRIORITY_TIER);
}

#[test]
fn test_malformed_tier_file_fails_load() {
    let dir = tempdir().expect("temp dir");
    let paths = write_data_dir(dir.path(), ALIASES, WHISPERS);
    fs::write(&paths.tiers, r#"{"Money": "first"}"#).unwrap();

    assert!(ContentStore::load(&paths).is_err());
}

#[test]
fn test_missing_fallback_does_not_fail_load() {
    let dir = tempdir().expect("temp dir");
    let paths = write_data_dir(dir.path(), ALIASES, WHISPERS);

    let store = ContentStore::load(&paths).expect("fallback is optional at load time");
    let mut rng = StdRng::seed_from_u64(9);
    assert_eq!(store.fallback.resolve(&mut rng), default_whisper());
    assert!(!store.fallback.is_loaded());
}

#[test]
fn test_fallback_file_is_read_lazily() {
    let dir = tempdir().expect("temp dir");
    let paths = write_data_dir(dir.path(), ALIASES, WHISPERS);
    let store = ContentStore::load(&paths).unwrap();

    // Written after load: still picked up on first use.
    fs::write(
        &paths.fallback,
        r#"{"mirror": "late", "whisper_start": "s", "blurred_reveal": "r", "encouragement": "e"}"#,
    )
    .unwrap();

    let mut rng = StdRng::seed_from_u64(9);
    assert_eq!(store.fallback.resolve(&mut rng).mirror, "late");
    assert!(store.fallback.is_loaded());
}
