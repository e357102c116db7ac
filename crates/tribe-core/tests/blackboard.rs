use std::collections::BTreeMap;

use proptest::prelude::*;
use tribe_core::{AgentTable, BbValue, Blackboard, BlackboardError, Vec2};

#[test]
fn blackboard_set_get_delete_roundtrip() {
    let mut bb = Blackboard::new();
    assert!(!bb.has("hunger"));

    bb.set("hunger", 42.5);
    bb.set("name", "Ada");

    assert_eq!(bb.number("hunger"), Ok(Some(42.5)));
    assert_eq!(bb.text("name"), Ok(Some("Ada".to_string())));

    assert_eq!(bb.delete("hunger"), Some(BbValue::Number(42.5)));
    assert_eq!(bb.get("hunger"), None);
    assert_eq!(bb.number("hunger"), Ok(None));
}

#[test]
fn blackboard_type_mismatch_is_an_error() {
    let mut bb = Blackboard::new();
    bb.set("flag", 1u32);

    let err = bb.flag("flag").unwrap_err();
    assert_eq!(
        err,
        BlackboardError::TypeMismatch {
            key: "flag".to_string(),
            expected: "bool",
            found: "number",
        }
    );
}

#[test]
fn nested_values_compare_structurally() {
    let mut inner = BTreeMap::new();
    inner.insert("pos".to_string(), BbValue::Vec2(Vec2::new(1.0, 2.0)));
    inner.insert(
        "ids".to_string(),
        BbValue::List(vec![BbValue::from(1u64), BbValue::from(2u64)]),
    );

    let mut a = Blackboard::new();
    let mut b = Blackboard::new();
    a.set("record", inner.clone());
    b.set("record", inner);

    assert_eq!(a.get("record"), b.get("record"));
    assert_eq!(a, b);
}

#[test]
fn get_mut_edits_values_in_place() {
    let mut bb = Blackboard::new();
    bb.set("path", BbValue::List(vec![BbValue::from(1u64)]));

    if let Some(BbValue::List(items)) = bb.get_mut("path") {
        items.push(BbValue::from(2u64));
    }
    assert_eq!(
        bb.get("path"),
        Some(&BbValue::List(vec![BbValue::from(1u64), BbValue::from(2u64)]))
    );
    assert!(bb.get_mut("missing").is_none());
}

#[test]
fn ids_are_only_read_back_when_exact() {
    assert_eq!(BbValue::from(42u64).as_id(), Some(42));
    assert_eq!(BbValue::Number(((1u64 << 53) - 1) as f64).as_id(), Some((1 << 53) - 1));
    assert_eq!(BbValue::Number((1u64 << 53) as f64).as_id(), None);
    assert_eq!(BbValue::Number(-1.0).as_id(), None);
    assert_eq!(BbValue::Number(2.5).as_id(), None);
}

#[test]
fn keys_with_prefix_only_returns_matching_keys() {
    let mut bb = Blackboard::new();
    bb.set("tribal_hunt_7", true);
    bb.set("tribal_gather_3", true);
    bb.set("tribe", true);
    bb.set("zzz", true);
    bb.set("caching_eat_time", 1.0);

    let keys: Vec<&str> = bb.keys_with_prefix("tribal_").collect();
    assert_eq!(keys, vec!["tribal_gather_3", "tribal_hunt_7"]);
}

#[test]
fn table_blackboards_are_created_at_spawn_and_dropped_at_despawn() {
    let mut table = AgentTable::<u64>::new();
    table.spawn(1);
    table
        .blackboard_mut(1)
        .expect("spawned agent has a blackboard")
        .set("k", 1.0);

    assert!(table.despawn(1));
    table.spawn(1);
    assert!(!table.blackboard(1).expect("respawned").has("k"));
}

#[test]
fn checked_out_blackboard_is_unavailable_until_returned() {
    let mut table = AgentTable::<u64>::new();
    table.spawn(1);

    let bb = table.take_blackboard(1).expect("available");
    assert!(table.blackboard_mut(1).is_none());
    table.put_blackboard(1, bb);
    assert!(table.blackboard_mut(1).is_some());
}

proptest! {
    #[test]
    fn setting_a_key_on_one_agent_never_changes_another(
        key in "[a-z_]{1,12}",
        before in any::<f64>().prop_filter("finite", |v| v.is_finite()),
        after in any::<f64>().prop_filter("finite", |v| v.is_finite()),
    ) {
        let mut table = AgentTable::<u64>::new();
        table.spawn(1);
        table.spawn(2);
        table.blackboard_mut(2).unwrap().set(key.clone(), before);

        table.blackboard_mut(1).unwrap().set(key.clone(), after);

        prop_assert_eq!(table.blackboard(2).unwrap().number(&key), Ok(Some(before)));
    }

    #[test]
    fn cloned_blackboards_do_not_alias(key in "[a-z]{1,8}", v in any::<bool>()) {
        let mut original = Blackboard::new();
        original.set(key.clone(), BbValue::List(vec![BbValue::Bool(v)]));
        let mut copy = original.clone();

        copy.set(key.clone(), BbValue::List(vec![]));

        prop_assert_eq!(
            original.get(&key),
            Some(&BbValue::List(vec![BbValue::Bool(v)]))
        );
    }
}

#[cfg(feature = "serde")]
#[test]
fn blackboard_values_survive_json() {
    let mut bb = Blackboard::new();
    bb.set("pos", Vec2::new(3.0, 4.0));
    bb.set("ids", BbValue::List(vec![BbValue::from(9u64)]));

    let json = serde_json::to_string(&bb).expect("serialize");
    let back: Blackboard = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, bb);
}
