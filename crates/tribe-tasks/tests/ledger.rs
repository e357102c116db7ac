use std::collections::BTreeMap;

use proptest::prelude::*;
use tribe_core::{BbValue, Blackboard};
use tribe_tasks::{
    CapacityRecord, CapacityTask, Claim, CoordinatorConfig, SingleTask, StorageAction, TaskKind,
    TaskLedger,
};

const X: u64 = 1;
const Y: u64 = 2;
const Z: u64 = 3;
const DEER: u64 = 100;

fn config() -> CoordinatorConfig {
    CoordinatorConfig {
        task_timeout_hours: 2.0,
        hunt_capacity: 2,
        attack_capacity: 4,
        storage_max_users: 2,
    }
}

#[test]
fn hunt_capacity_is_enforced_and_freed_by_member_removal() {
    let config = config();
    let mut bb = Blackboard::new();
    let mut ledger = TaskLedger::new(&mut bb, &config);

    assert_eq!(ledger.register_task(CapacityTask::Hunt, DEER, X, 0.0), Claim::Created);
    assert_eq!(ledger.register_task(CapacityTask::Hunt, DEER, Y, 0.1), Claim::Joined);
    assert_eq!(ledger.register_task(CapacityTask::Hunt, DEER, Z, 0.2), Claim::Rejected);
    assert!(!ledger.has_capacity(CapacityTask::Hunt, DEER, 0.2));

    assert_eq!(ledger.remove_member(X), 1);
    assert_eq!(ledger.assignees(CapacityTask::Hunt, DEER, 0.3), vec![Y]);
    assert_eq!(ledger.register_task(CapacityTask::Hunt, DEER, Z, 0.3), Claim::Joined);
    assert_eq!(ledger.assignees(CapacityTask::Hunt, DEER, 0.3), vec![Y, Z]);
}

#[test]
fn registering_twice_is_idempotent() {
    let config = config();
    let mut bb = Blackboard::new();
    let mut ledger = TaskLedger::new(&mut bb, &config);

    ledger.register_task(CapacityTask::Hunt, DEER, X, 0.0);
    assert_eq!(
        ledger.register_task(CapacityTask::Hunt, DEER, X, 0.5),
        Claim::AlreadyAssigned
    );
    assert_eq!(ledger.assignment_count(CapacityTask::Hunt, DEER, 0.5), 1);
    assert!(ledger.is_assigned(CapacityTask::Hunt, DEER, X, 0.5));
}

#[test]
fn stale_capacity_record_is_reset_for_the_next_claimant() {
    let config = config();
    let mut bb = Blackboard::new();
    let mut ledger = TaskLedger::new(&mut bb, &config);

    ledger.register_task(CapacityTask::Hunt, DEER, X, 0.0);
    ledger.register_task(CapacityTask::Hunt, DEER, Y, 0.0);

    // Exactly at the timeout the record still counts.
    assert_eq!(ledger.register_task(CapacityTask::Hunt, DEER, Z, 2.0), Claim::Rejected);

    assert_eq!(ledger.register_task(CapacityTask::Hunt, DEER, Z, 2.5), Claim::Reset);
    assert_eq!(ledger.assignees(CapacityTask::Hunt, DEER, 2.5), vec![Z]);
}

#[test]
fn stale_records_read_as_empty() {
    let config = config();
    let mut bb = Blackboard::new();
    let mut ledger = TaskLedger::new(&mut bb, &config);

    ledger.register_task(CapacityTask::Attack, 9, X, 0.0);
    assert!(ledger.assignees(CapacityTask::Attack, 9, 3.0).is_empty());
    assert!(ledger.has_capacity(CapacityTask::Attack, 9, 3.0));
}

#[test]
fn unregister_deletes_the_record_once_empty() {
    let config = config();
    let mut bb = Blackboard::new();
    {
        let mut ledger = TaskLedger::new(&mut bb, &config);
        ledger.register_task(CapacityTask::Hunt, DEER, X, 0.0);
        ledger.register_task(CapacityTask::Hunt, DEER, Y, 0.0);

        assert!(ledger.unregister_task(CapacityTask::Hunt, DEER, X));
        assert!(!ledger.unregister_task(CapacityTask::Hunt, DEER, X));
        assert!(ledger.unregister_task(CapacityTask::Hunt, DEER, Y));
    }
    assert!(!bb.has(&TaskKind::Hunt.key(DEER)));
}

#[test]
fn records_are_stored_under_tribal_keys() {
    let config = config();
    let mut bb = Blackboard::new();
    TaskLedger::new(&mut bb, &config).register_task(CapacityTask::Hunt, DEER, X, 1.5);

    let stored = bb.get("tribal_hunt_100").expect("record");
    assert_eq!(
        CapacityRecord::from_value(stored),
        Some(CapacityRecord {
            member_ids: vec![X],
            start_time: 1.5,
            max_assignments: 2,
        })
    );
    assert_eq!(TaskKind::parse_key("tribal_hunt_100"), Some((TaskKind::Hunt, DEER)));
    assert_eq!(TaskKind::parse_key("tribal_swim_100"), None);
}

#[test]
fn single_claim_blocks_others_until_stale() {
    let config = config();
    let mut bb = Blackboard::new();
    let mut ledger = TaskLedger::new(&mut bb, &config);
    let bush = 7;

    assert_eq!(ledger.claim_single(SingleTask::Gather, bush, X, 0.0), Claim::Created);
    assert_eq!(ledger.claim_single(SingleTask::Gather, bush, Y, 0.5), Claim::Rejected);

    // Re-claiming refreshes the timestamp.
    assert_eq!(
        ledger.claim_single(SingleTask::Gather, bush, X, 1.0),
        Claim::AlreadyAssigned
    );
    assert_eq!(ledger.single_assignee(SingleTask::Gather, bush, 2.5), Some(X));

    assert_eq!(ledger.claim_single(SingleTask::Gather, bush, Y, 3.5), Claim::Reset);
    assert_eq!(ledger.single_assignee(SingleTask::Gather, bush, 3.5), Some(Y));

    assert!(!ledger.release_single(SingleTask::Gather, bush, X));
    assert!(ledger.release_single(SingleTask::Gather, bush, Y));
    assert_eq!(ledger.single_assignee(SingleTask::Gather, bush, 3.5), None);
}

#[test]
fn gather_and_plant_claims_are_independent() {
    let config = config();
    let mut bb = Blackboard::new();
    let mut ledger = TaskLedger::new(&mut bb, &config);

    assert!(ledger.claim_single(SingleTask::Gather, 7, X, 0.0).is_granted());
    assert!(ledger.claim_single(SingleTask::Plant, 7, Y, 0.0).is_granted());
}

#[test]
fn storage_refreshes_existing_users_instead_of_duplicating() {
    let config = config();
    let mut bb = Blackboard::new();
    let mut ledger = TaskLedger::new(&mut bb, &config);
    let chest = 40;

    assert_eq!(
        ledger.acquire_storage(chest, X, StorageAction::Store, 0.0),
        Claim::Created
    );
    assert_eq!(
        ledger.acquire_storage(chest, X, StorageAction::Retrieve, 1.0),
        Claim::AlreadyAssigned
    );

    let users = ledger.storage_users(chest, 1.0);
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].action, StorageAction::Retrieve);
    assert_eq!(users[0].start_time, 1.0);

    assert_eq!(
        ledger.acquire_storage(chest, Y, StorageAction::Store, 1.0),
        Claim::Joined
    );
    assert_eq!(
        ledger.acquire_storage(chest, Z, StorageAction::Store, 1.0),
        Claim::Rejected
    );
}

#[test]
fn stale_storage_users_are_dropped_on_access() {
    let config = config();
    let mut bb = Blackboard::new();
    let mut ledger = TaskLedger::new(&mut bb, &config);
    let chest = 40;

    ledger.acquire_storage(chest, X, StorageAction::Store, 0.0);
    ledger.acquire_storage(chest, Y, StorageAction::Store, 1.0);

    assert!(ledger
        .acquire_storage(chest, Z, StorageAction::Retrieve, 2.5)
        .is_granted());
    let members: Vec<u64> = ledger
        .storage_users(chest, 2.5)
        .iter()
        .map(|u| u.member_id)
        .collect();
    assert_eq!(members, vec![Y, Z]);

    assert!(ledger.release_storage(chest, Y));
    assert!(ledger.release_storage(chest, Z));
    assert!(!ledger.release_storage(chest, Z));
}

#[test]
fn corrupt_entries_are_treated_as_absent() {
    let config = config();
    let mut bb = Blackboard::new();
    bb.set(TaskKind::Hunt.key(DEER), "garbage");

    let mut bad_single = BTreeMap::new();
    bad_single.insert("memberId".to_string(), BbValue::Text("x".into()));
    bad_single.insert("startTime".to_string(), BbValue::Number(0.0));
    bb.set(TaskKind::Gather.key(7), bad_single);

    let mut bad_storage = BTreeMap::new();
    bad_storage.insert("users".to_string(), BbValue::List(vec![BbValue::Number(3.0)]));
    bb.set(TaskKind::Storage.key(40), bad_storage);

    let mut ledger = TaskLedger::new(&mut bb, &config);
    assert!(ledger.assignees(CapacityTask::Hunt, DEER, 0.0).is_empty());
    assert_eq!(ledger.single_assignee(SingleTask::Gather, 7, 0.0), None);
    assert!(ledger.storage_users(40, 0.0).is_empty());

    assert_eq!(ledger.register_task(CapacityTask::Hunt, DEER, X, 0.0), Claim::Created);
    assert_eq!(ledger.claim_single(SingleTask::Gather, 7, X, 0.0), Claim::Created);
    assert_eq!(
        ledger.acquire_storage(40, X, StorageAction::Store, 0.0),
        Claim::Created
    );
}

#[test]
fn sweep_evicts_stale_and_unreadable_records() {
    let config = config();
    let mut bb = Blackboard::new();
    bb.set("hunger", 0.4);
    bb.set("tribal_unknown_3", 1.0);
    bb.set(TaskKind::Attack.key(5), true);
    {
        let mut ledger = TaskLedger::new(&mut bb, &config);
        ledger.register_task(CapacityTask::Hunt, DEER, X, 0.0);
        ledger.claim_single(SingleTask::Gather, 7, Y, 1.0);
        ledger.acquire_storage(40, X, StorageAction::Store, 0.0);
        ledger.acquire_storage(40, Y, StorageAction::Store, 1.5);

        assert_eq!(ledger.sweep_stale(2.5), 2);
        assert_eq!(ledger.single_assignee(SingleTask::Gather, 7, 2.5), Some(Y));
        let members: Vec<u64> = ledger
            .storage_users(40, 2.5)
            .iter()
            .map(|u| u.member_id)
            .collect();
        assert_eq!(members, vec![Y]);
    }

    assert!(!bb.has(&TaskKind::Hunt.key(DEER)));
    assert!(!bb.has(&TaskKind::Attack.key(5)));
    assert!(bb.has("tribal_unknown_3"));
    assert!(bb.has("hunger"));
}

#[test]
fn remove_member_clears_every_kind_of_record() {
    let config = config();
    let mut bb = Blackboard::new();
    let mut ledger = TaskLedger::new(&mut bb, &config);

    ledger.register_task(CapacityTask::Hunt, DEER, X, 0.0);
    ledger.register_task(CapacityTask::Hunt, DEER, Y, 0.0);
    ledger.claim_single(SingleTask::Gather, 7, X, 0.0);
    ledger.claim_single(SingleTask::Gather, 8, Y, 0.0);
    ledger.acquire_storage(40, X, StorageAction::Store, 0.0);

    assert_eq!(ledger.remove_member(X), 3);
    assert_eq!(ledger.assignees(CapacityTask::Hunt, DEER, 0.0), vec![Y]);
    assert_eq!(ledger.single_assignee(SingleTask::Gather, 7, 0.0), None);
    assert_eq!(ledger.single_assignee(SingleTask::Gather, 8, 0.0), Some(Y));
    assert!(ledger.storage_users(40, 0.0).is_empty());

    assert_eq!(ledger.remove_member(X), 0);
}

#[test]
fn member_ids_beyond_f64_precision_keep_their_identity() {
    let big = (1u64 << 53) + 1;
    let config = config();
    let mut bb = Blackboard::new();
    let mut ledger = TaskLedger::new(&mut bb, &config);

    assert_eq!(ledger.register_task(CapacityTask::Hunt, DEER, big, 0.0), Claim::Created);
    assert_eq!(
        ledger.register_task(CapacityTask::Hunt, DEER, big, 0.1),
        Claim::AlreadyAssigned
    );
    assert_eq!(ledger.assignees(CapacityTask::Hunt, DEER, 0.1), vec![big]);

    assert_eq!(ledger.claim_single(SingleTask::Plant, 7, big, 0.0), Claim::Created);
    assert_eq!(
        ledger.claim_single(SingleTask::Plant, 7, big - 1, 0.0),
        Claim::Rejected
    );
    assert_eq!(ledger.single_assignee(SingleTask::Plant, 7, 0.0), Some(big));
    assert_eq!(
        ledger.acquire_storage(40, big, StorageAction::Retrieve, 0.0),
        Claim::Created
    );

    assert_eq!(ledger.remove_member(big), 3);
    assert!(ledger.assignees(CapacityTask::Hunt, DEER, 0.2).is_empty());
    assert!(ledger.storage_users(40, 0.2).is_empty());
}

#[derive(Debug, Clone)]
enum Op {
    Register(u64),
    Unregister(u64),
    Remove(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u64..6).prop_map(Op::Register),
        1 => (0u64..6).prop_map(Op::Unregister),
        1 => (0u64..6).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn capacity_is_never_exceeded(
        ops in prop::collection::vec((op(), 0.0f64..1.0), 1..60),
    ) {
        let config = config();
        let mut bb = Blackboard::new();
        let mut now = 0.0;

        for (op, step) in ops {
            now += step;
            let mut ledger = TaskLedger::new(&mut bb, &config);
            match op {
                Op::Register(m) => {
                    ledger.register_task(CapacityTask::Hunt, DEER, m, now);
                }
                Op::Unregister(m) => {
                    ledger.unregister_task(CapacityTask::Hunt, DEER, m);
                }
                Op::Remove(m) => {
                    ledger.remove_member(m);
                }
            }

            let record = bb
                .get(&TaskKind::Hunt.key(DEER))
                .and_then(CapacityRecord::from_value);
            if let Some(record) = record {
                prop_assert!(!record.member_ids.is_empty());
                prop_assert!(record.member_ids.len() <= record.max_assignments);
                let mut unique = record.member_ids.clone();
                unique.sort_unstable();
                unique.dedup();
                prop_assert_eq!(unique.len(), record.member_ids.len());
            }
        }
    }
}
