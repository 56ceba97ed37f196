//! Engine configuration from the environment and JSON.

use std::sync::Mutex;

use relalg::prelude::*;

// Environment variables are process-wide.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: [&str; 5] = [
    "RELALG_STORE_DIR",
    "RELALG_STORE_URI",
    "RELALG_FILE_EXT",
    "RELALG_INDEX",
    "RELALG_CODEC",
];

fn clear_env() {
    for v in VARS {
        std::env::remove_var(v);
    }
}

#[test]
fn test_env_overrides_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    clear_env();
    std::env::set_var("RELALG_STORE_DIR", "/tmp/relalg-db");
    std::env::set_var("RELALG_FILE_EXT", ".tbl");
    std::env::set_var("RELALG_INDEX", "tree_map");
    std::env::set_var("RELALG_CODEC", "LZ4");

    let cfg = EngineConfig::from_env();
    clear_env();

    assert_eq!(cfg.store_dir, "/tmp/relalg-db");
    assert_eq!(cfg.file_extension, "tbl");
    assert_eq!(cfg.index_kind, IndexKind::Ordered);
    assert_eq!(cfg.snapshot_codec, "lz4");

    let sc = cfg.storage_config();
    assert_eq!(sc.root, "/tmp/relalg-db");
    assert_eq!(sc.extension, "tbl");
}

#[test]
fn test_unparsable_index_is_ignored() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    clear_env();
    std::env::set_var("RELALG_INDEX", "skiplist");
    let cfg = EngineConfig::from_env();
    clear_env();
    assert_eq!(cfg.index_kind, IndexKind::None);
    assert_eq!(cfg, EngineConfig::default());
}

#[test]
fn test_json_config_drives_store() {
    let cfg = EngineConfig::from_json(
        r#"{"store_uri":"memory://json","file_extension":"snap","index_kind":"Ordered"}"#,
    )
    .unwrap();
    let store = TableStore::from_config(&cfg.storage_config()).unwrap();
    assert_eq!(store.path_for("movie").unwrap(), "memory://json/movie.snap");
}
