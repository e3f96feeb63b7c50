//! End-to-end tests across the tree, codec, and store layers
//!
//! These exercise the complete flow: decode a config file, read and mutate
//! it through dotted paths, and verify what lands back on disk.

use conf_store::{ConfigStore, ReloadPolicy};
use conf_tree::Value;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const BLOCK_CONFIG: &str = "\
#application config
#generated by setup

server {
  host = 0.0.0.0
  port = 8080
  #fallback endpoints
  mirrors = [
    - one.example
    - two.example
  ]
}

logging {
  level = info
}
";

#[test]
fn test_read_modify_write_preserves_layout() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.ls");
    fs::write(&path, BLOCK_CONFIG).unwrap();

    let store = ConfigStore::open(&path).unwrap();
    assert_eq!(store.get_str("server.host").unwrap().as_deref(), Some("0.0.0.0"));
    assert_eq!(
        store.header().unwrap(),
        vec!["#application config", "#generated by setup"]
    );

    store.set("logging.level", "debug").unwrap();

    let on_disk = fs::read_to_string(&path).unwrap();
    assert!(on_disk.starts_with("#application config\n#generated by setup\n"));
    assert!(on_disk.contains("  #fallback endpoints\n"));
    assert!(on_disk.contains("  level = debug\n"));
    assert!(!on_disk.contains("level = info"));
}

#[test]
fn test_full_surface_walkthrough() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.ls");
    fs::write(&path, BLOCK_CONFIG).unwrap();

    let store = ConfigStore::open(&path).unwrap();
    assert_eq!(
        store.keys().unwrap(),
        vec!["server.host", "server.port", "server.mirrors", "logging.level"]
    );
    assert_eq!(store.block_keys().unwrap(), vec!["server", "logging"]);
    assert_eq!(
        store.block_keys_at("server").unwrap(),
        vec!["host", "port", "mirrors"]
    );
    assert_eq!(store.len().unwrap(), 4);

    let mirrors = store.get("server.mirrors").unwrap().unwrap();
    assert_eq!(
        mirrors.as_list().unwrap(),
        &[Value::from("one.example"), Value::from("two.example")]
    );
}

#[test]
fn test_remove_last_leaf_prunes_block_on_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.ls");
    fs::write(&path, "a {\n  only = 1\n}\nkeep = 2\n").unwrap();

    let store = ConfigStore::open(&path).unwrap();
    store.remove("a.only").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "keep = 2\n");
}

#[test]
fn test_same_tree_operations_on_every_format() {
    let temp = TempDir::new().unwrap();
    for name in ["app.ls", "app.yml", "app.json", "app.toml"] {
        let path = temp.path().join(name);
        let store = ConfigStore::open(&path).unwrap();

        store.set("database.host", "db.internal").unwrap();
        store.set("database.pool.size", "16").unwrap();
        store.set("features", vec!["alpha", "beta"]).unwrap();
        store.remove("database.pool.size").unwrap();

        let reopened = ConfigStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_str("database.host").unwrap().as_deref(),
            Some("db.internal"),
            "format {name}"
        );
        assert!(!reopened.contains("database.pool").unwrap(), "format {name}");
        let features = reopened.get("features").unwrap().unwrap();
        assert_eq!(features.as_list().unwrap().len(), 2, "format {name}");
    }
}

#[test]
fn test_two_stores_last_writer_wins() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("shared.ls");

    let first = ConfigStore::open_with_policy(&path, ReloadPolicy::Always).unwrap();
    let second = ConfigStore::open_with_policy(&path, ReloadPolicy::Always).unwrap();

    first.set("owner", "first").unwrap();
    second.set("owner", "second").unwrap();

    // Always-policy stores converge on whatever hit the disk last.
    assert_eq!(first.get_str("owner").unwrap().as_deref(), Some("second"));
}

#[test]
fn test_header_workflow_across_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.ls");

    let store = ConfigStore::open(&path).unwrap();
    store.set("key", "1").unwrap();
    store.set_header(&["managed file", "#edits may be overwritten"]).unwrap();
    store.set_footer(&["end of file"]).unwrap();
    drop(store);

    let reopened = ConfigStore::open(&path).unwrap();
    assert_eq!(
        reopened.header().unwrap(),
        vec!["#managed file", "#edits may be overwritten"]
    );
    assert_eq!(reopened.footer().unwrap(), vec!["#end of file"]);
    assert_eq!(reopened.get_str("key").unwrap().as_deref(), Some("1"));
}
