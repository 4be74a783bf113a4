use deercheck_core::domain::{build_search_pattern, OrderId};
use deercheck_store::error::StoreErrorKind;
use deercheck_store::repo::OrderNew;
use deercheck_store::Store;
use serde_json::{json, Value};

fn store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

fn order(id: Option<&str>, value: Value) -> OrderNew {
    OrderNew::from_value(id.map(|raw| OrderId::parse(raw).expect("id")), value).expect("order")
}

#[test]
fn create_then_get_returns_document() {
    let store = store();
    let now = 1_700_000_000;
    let created = store
        .orders()
        .create(
            now,
            order(
                Some("xyz789"),
                json!({"name": "Pat", "phone": "(555) 123-4567", "depositPaid": 50}),
            ),
        )
        .expect("create order");
    assert_eq!(created.id.as_str(), "xyz789");

    let fetched = store
        .orders()
        .get(&created.id)
        .expect("get order")
        .expect("order exists");
    assert_eq!(fetched.created_at, now);
    assert_eq!(fetched.fields["name"], json!("Pat"));
    assert_eq!(fetched.fields["depositPaid"], json!(50));
}

#[test]
fn get_missing_returns_none() {
    let store = store();
    let missing = store
        .orders()
        .get(&OrderId::parse("abc123").expect("id"))
        .expect("get order");
    assert!(missing.is_none());
}

#[test]
fn create_generates_id_when_absent() {
    let store = store();
    let created = store
        .orders()
        .create(1, order(None, json!({"name": "Sam"})))
        .expect("create order");
    assert!(!created.id.as_str().is_empty());
    assert_eq!(store.orders().count().expect("count"), 1);
}

#[test]
fn duplicate_ids_are_rejected() {
    let store = store();
    store
        .orders()
        .create(1, order(Some("dup"), json!({})))
        .expect("create order");
    let err = store
        .orders()
        .create(2, order(Some("dup"), json!({})))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::DuplicateId);
}

#[test]
fn non_object_documents_are_rejected() {
    let err = OrderNew::from_value(None, json!("just a string")).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Core);
}

#[test]
fn phone_pattern_matches_any_stored_format_newest_first() {
    let store = store();
    let repo = store.orders();
    repo.create(100, order(Some("a"), json!({"phone": "(555) 123-4567"})))
        .expect("create a");
    repo.create(300, order(Some("b"), json!({"phone": "555.123.4567"})))
        .expect("create b");
    repo.create(200, order(Some("c"), json!({"phone": "+1 555 123 4567"})))
        .expect("create c");
    repo.create(400, order(Some("d"), json!({"phone": "(555) 987-6543"})))
        .expect("create d");
    repo.create(500, order(Some("e"), json!({"name": "no phone"})))
        .expect("create e");

    let pattern = build_search_pattern("555-123-4567");
    let matches = repo.list_by_phone_pattern(&pattern).expect("list");
    let ids: Vec<&str> = matches.iter().map(|order| order.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);

    let latest = repo
        .latest_by_phone_pattern(&pattern)
        .expect("latest")
        .expect("match");
    assert_eq!(latest.id.as_str(), "b");
}

#[test]
fn equal_timestamps_break_ties_by_id() {
    let store = store();
    let repo = store.orders();
    repo.create(100, order(Some("first"), json!({"phone": "5551234567"})))
        .expect("create");
    repo.create(100, order(Some("second"), json!({"phone": "555-123-4567"})))
        .expect("create");
    let latest = repo
        .latest_by_phone_pattern(&build_search_pattern("5551234567"))
        .expect("latest")
        .expect("match");
    assert_eq!(latest.id.as_str(), "second");
}

#[test]
fn short_pattern_only_matches_exact_sequence() {
    let store = store();
    let repo = store.orders();
    repo.create(1, order(Some("a"), json!({"phone": "555"})))
        .expect("create");
    repo.create(2, order(Some("b"), json!({"phone": "(555) 123-4567"})))
        .expect("create");
    repo.create(3, order(Some("c"), json!({"phone": "5-5-5"})))
        .expect("create");
    let matches = repo
        .list_by_phone_pattern(&build_search_pattern("555"))
        .expect("list");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id.as_str(), "a");
}

#[test]
fn integer_phone_is_searchable() {
    let store = store();
    let repo = store.orders();
    repo.create(1, order(Some("num"), json!({"phone": 5551234567_u64})))
        .expect("create");
    repo.create(2, order(Some("flag"), json!({"phone": true})))
        .expect("create");
    let latest = repo
        .latest_by_phone_pattern(&build_search_pattern("(555) 123-4567"))
        .expect("latest")
        .expect("match");
    assert_eq!(latest.id.as_str(), "num");
    assert_eq!(latest.fields["phone"], json!(5551234567_u64));
}
