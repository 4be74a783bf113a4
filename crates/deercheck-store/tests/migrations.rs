use deercheck_store::error::StoreErrorKind;
use deercheck_store::migrate::latest_version;
use deercheck_store::Store;
use tempfile::TempDir;

#[test]
fn migrate_is_idempotent() {
    let store = Store::open_in_memory().expect("open in memory");
    assert_eq!(store.schema_version().expect("version"), 0);
    store.migrate().expect("migrate");
    store.migrate().expect("migrate again");
    assert_eq!(store.schema_version().expect("version"), latest_version());
}

#[test]
fn newer_database_is_rejected() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
        .connection()
        .execute("UPDATE deercheck_schema SET version = 99;", [])
        .expect("bump version");
    let err = store.migrate().unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Migration);
}

#[test]
fn file_database_persists_between_opens() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("deercheck.sqlite3");
    {
        let store = Store::open(&db_path).expect("open");
        store.migrate().expect("migrate");
    }
    let store = Store::open(&db_path).expect("reopen");
    assert_eq!(store.schema_version().expect("version"), latest_version());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&db_path)
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o077, 0);
    }
}
