#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{new_registry, Device};
use yangtree_core::errors::YangError;
use yangtree_core::logging_facility::test_capture::init_test_capture;
use yangtree_core::types::LeafType;
use yangtree_core::yangtree_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use yangtree_core::{
    log_op_end, log_op_error, log_op_start, ContainerSchema, ElementSpec, ListSchema, NodeSchema,
    Tree, Value,
};

/// A single-list tree rooted at `root_path` so captured paths are unique per test
fn tree_at(root_path: &str) -> (Tree, yangtree_core::ElementId) {
    let (_registry, shared) = new_registry();
    let mut tree = Tree::new();
    let schema = NodeSchema::container(ContainerSchema::new().child(
        "peer",
        NodeSchema::list(ListSchema::new(
            "name",
            ContainerSchema::new().child("name", NodeSchema::leaf(LeafType::string())),
        )),
    ));
    let root = tree
        .instantiate(
            &schema,
            ElementSpec::new("root")
                .path_helper(shared)
                .register_path(root_path),
        )
        .unwrap();
    let peer = tree.child(root, "peer").unwrap();
    (tree, peer)
}

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let events = capture.events();
    let start_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert!(
        !start_events.is_empty(),
        "Should have captured at least one start event"
    );
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].fields.get("duration_ms"), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = YangError::MissingKey {
        list: "/interfaces/interface".to_string(),
        key: "eth9".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(
        error_events[0].fields.get("err_code"),
        Some(&"ERR_MISSING_KEY".to_string())
    );
}

#[test]
fn test_list_add_logs_single_start_and_end() {
    let capture = init_test_capture();
    let (mut tree, peer) = tree_at("/log-add");

    tree.list(peer).unwrap().add(Some("p1")).unwrap();

    let ours: Vec<_> = capture
        .events_for_op("list_add")
        .into_iter()
        .filter(|e| e.path.as_deref() == Some("/log-add/peer"))
        .collect();
    let starts = ours
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .count();
    let ends: Vec<_> = ours
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(starts, 1, "Should have exactly one start event");
    assert_eq!(ends.len(), 1, "Should have exactly one end event");
    assert_eq!(ends[0].fields.get("key"), Some(&"p1".to_string()));
    assert!(ends[0].fields.contains_key("duration_ms"));
}

#[test]
fn test_failed_add_logs_no_end_and_no_error() {
    let capture = init_test_capture();
    let (mut tree, peer) = tree_at("/log-dup");
    let mut list = tree.list(peer).unwrap();
    list.add(Some("p1")).unwrap();
    assert!(list.add(Some("p1")).is_err());

    let ours: Vec<_> = capture
        .events_for_op("list_add")
        .into_iter()
        .filter(|e| e.path.as_deref() == Some("/log-dup/peer"))
        .collect();
    let count = |event: &str| {
        ours.iter()
            .filter(|e| e.event.as_deref() == Some(event))
            .count()
    };

    assert_eq!(count(EVENT_START), 2);
    assert_eq!(count(EVENT_END), 1);
    assert_eq!(count(EVENT_END_ERROR), 0, "the engine leaves error reporting to callers");
}

#[test]
fn test_registry_traffic_balances_over_entry_lifecycle() {
    let capture = init_test_capture();
    let (mut tree, peer) = tree_at("/log-traffic");
    let entry_path = "/log-traffic/peer[name=p1]";
    let key_path = "/log-traffic/peer[name=p1]/name";

    tree.list(peer).unwrap().add(Some("p1")).unwrap();
    assert_eq!(capture.registry_traffic(entry_path), (1, 0));
    assert_eq!(capture.registry_traffic(key_path), (1, 0));

    tree.list(peer).unwrap().delete("p1").unwrap();
    assert_eq!(capture.registry_traffic(entry_path), (1, 1));
    assert_eq!(capture.registry_traffic(key_path), (1, 1));
    capture.assert_event_exists("list_delete", EVENT_END);
}

#[test]
fn test_instantiate_reports_subtree_size() {
    let capture = init_test_capture();
    let (_tree, _peer) = tree_at("/log-instantiate");

    let end = capture
        .events_for_op("instantiate")
        .into_iter()
        .find(|e| {
            e.event.as_deref() == Some(EVENT_END) && e.path.as_deref() == Some("/log-instantiate")
        })
        .expect("instantiate end event");
    // root container plus the list element
    assert_eq!(end.fields.get("subtree_len"), Some(&"2".to_string()));
}

#[test]
fn test_leaf_list_members_are_logged_as_registry_traffic() {
    let capture = init_test_capture();
    let mut device = Device::new(false);

    device
        .tree
        .list(device.interfaces)
        .unwrap()
        .add(Some("log-member-if"))
        .unwrap();
    let address = device.interface_leaf("log-member-if", "address");
    let member_path = "/interfaces/interface[name=log-member-if]/address/203.0.113.9";

    device
        .tree
        .append(address, &Value::from("203.0.113.9"))
        .unwrap();
    device
        .tree
        .remove(address, &Value::from("203.0.113.9"))
        .unwrap();
    assert_eq!(capture.registry_traffic(member_path), (1, 1));
}
