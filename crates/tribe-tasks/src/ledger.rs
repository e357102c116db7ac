use tribe_core::{BbValue, Blackboard, EntityId};

use crate::config::CoordinatorConfig;
use crate::kind::{CapacityTask, SingleTask, TaskKind, LEDGER_PREFIX};
use crate::record::{CapacityRecord, SingleRecord, StorageAction, StorageRecord, StorageUser};

/// Result of a claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// No usable record existed; a fresh one was written.
    Created,
    /// An expired record was replaced by a fresh one.
    Reset,
    /// The member already held the claim.
    AlreadyAssigned,
    /// The member was added to a live record with spare capacity.
    Joined,
    /// The record is live and full (or held by someone else).
    Rejected,
}

impl Claim {
    pub fn is_granted(self) -> bool {
        self != Claim::Rejected
    }
}

/// Task ledger kept on one coordination point's blackboard.
///
/// A ledger is a short-lived view: build one per operation and drop it. Members are identified by
/// [`AgentId::stable_id`](tribe_core::AgentId::stable_id).
pub struct TaskLedger<'a> {
    blackboard: &'a mut Blackboard,
    config: &'a CoordinatorConfig,
}

impl<'a> TaskLedger<'a> {
    pub fn new(blackboard: &'a mut Blackboard, config: &'a CoordinatorConfig) -> Self {
        Self { blackboard, config }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        self.config
    }

    fn capacity_record(&self, key: &str) -> Option<CapacityRecord> {
        self.blackboard.get(key).and_then(CapacityRecord::from_value)
    }

    fn single_record(&self, key: &str) -> Option<SingleRecord> {
        self.blackboard.get(key).and_then(SingleRecord::from_value)
    }

    fn storage_record(&self, key: &str) -> Option<StorageRecord> {
        self.blackboard.get(key).and_then(StorageRecord::from_value)
    }

    fn live_capacity_record(
        &self,
        task: CapacityTask,
        target: EntityId,
        now: f64,
    ) -> Option<CapacityRecord> {
        self.capacity_record(&task.kind().key(target))
            .filter(|r| !self.config.is_stale(r.start_time, now))
    }

    /// Claim a slot on a multi-assignee task.
    ///
    /// 1. no record (or an unreadable one): create it with this member;
    /// 2. the record is stale: replace it with a fresh one holding only this member;
    /// 3. the member is already listed: granted, nothing changes;
    /// 4. spare capacity: append the member;
    /// 5. otherwise rejected.
    pub fn register_task(
        &mut self,
        task: CapacityTask,
        target: EntityId,
        member: u64,
        now: f64,
    ) -> Claim {
        let capacity = self.config.capacity_for(task);
        self.register_task_with_capacity(task, target, member, now, capacity)
    }

    /// [`register_task`](Self::register_task) with an explicit capacity for newly created records.
    /// A live record keeps the capacity it was created with.
    pub fn register_task_with_capacity(
        &mut self,
        task: CapacityTask,
        target: EntityId,
        member: u64,
        now: f64,
        max_assignments: usize,
    ) -> Claim {
        let key = task.kind().key(target);
        let max_assignments = max_assignments.max(1);

        let claim = match self.capacity_record(&key) {
            None => {
                self.blackboard.set(
                    key.as_str(),
                    CapacityRecord::new(member, now, max_assignments).to_value(),
                );
                Claim::Created
            }
            Some(record) if self.config.is_stale(record.start_time, now) => {
                self.blackboard.set(
                    key.as_str(),
                    CapacityRecord::new(member, now, max_assignments).to_value(),
                );
                Claim::Reset
            }
            Some(record) if record.contains(member) => Claim::AlreadyAssigned,
            Some(mut record) if !record.is_full() => {
                record.member_ids.push(member);
                self.blackboard.set(key.as_str(), record.to_value());
                Claim::Joined
            }
            Some(_) => Claim::Rejected,
        };

        tracing::debug!(task = task.kind().as_str(), target, member, ?claim, "register task");
        claim
    }

    /// Remove `member` from the task; the record is deleted once nobody is left.
    pub fn unregister_task(&mut self, task: CapacityTask, target: EntityId, member: u64) -> bool {
        let key = task.kind().key(target);
        let Some(mut record) = self.capacity_record(&key) else {
            return false;
        };
        let before = record.member_ids.len();
        record.member_ids.retain(|&m| m != member);
        if record.member_ids.len() == before {
            return false;
        }

        if record.member_ids.is_empty() {
            self.blackboard.delete(&key);
        } else {
            self.blackboard.set(key, record.to_value());
        }
        tracing::debug!(task = task.kind().as_str(), target, member, "unregister task");
        true
    }

    /// Members currently assigned. Empty when the record is missing, stale or unreadable.
    pub fn assignees(&self, task: CapacityTask, target: EntityId, now: f64) -> Vec<u64> {
        self.live_capacity_record(task, target, now)
            .map(|r| r.member_ids)
            .unwrap_or_default()
    }

    pub fn assignment_count(&self, task: CapacityTask, target: EntityId, now: f64) -> usize {
        self.live_capacity_record(task, target, now)
            .map_or(0, |r| r.member_ids.len())
    }

    pub fn is_assigned(
        &self,
        task: CapacityTask,
        target: EntityId,
        member: u64,
        now: f64,
    ) -> bool {
        self.live_capacity_record(task, target, now)
            .is_some_and(|r| r.contains(member))
    }

    /// Whether a new member could join right now.
    pub fn has_capacity(&self, task: CapacityTask, target: EntityId, now: f64) -> bool {
        self.live_capacity_record(task, target, now)
            .map_or(true, |r| !r.is_full())
    }

    /// Claim an exclusive task. Re-claiming by the holder refreshes the timestamp.
    pub fn claim_single(
        &mut self,
        task: SingleTask,
        target: EntityId,
        member: u64,
        now: f64,
    ) -> Claim {
        let key = task.kind().key(target);
        let claim = match self.single_record(&key) {
            None => Claim::Created,
            Some(record) if record.member_id == member => Claim::AlreadyAssigned,
            Some(record) if self.config.is_stale(record.start_time, now) => Claim::Reset,
            Some(_) => Claim::Rejected,
        };

        if claim.is_granted() {
            let record = SingleRecord {
                member_id: member,
                start_time: now,
            };
            self.blackboard.set(key, record.to_value());
        }
        tracing::debug!(task = task.kind().as_str(), target, member, ?claim, "claim single");
        claim
    }

    /// Holder of a live exclusive claim.
    pub fn single_assignee(&self, task: SingleTask, target: EntityId, now: f64) -> Option<u64> {
        self.single_record(&task.kind().key(target))
            .filter(|r| !self.config.is_stale(r.start_time, now))
            .map(|r| r.member_id)
    }

    /// Drop the claim if `member` holds it.
    pub fn release_single(&mut self, task: SingleTask, target: EntityId, member: u64) -> bool {
        let key = task.kind().key(target);
        match self.single_record(&key) {
            Some(record) if record.member_id == member => {
                self.blackboard.delete(&key);
                tracing::debug!(task = task.kind().as_str(), target, member, "release single");
                true
            }
            _ => false,
        }
    }

    /// Start using a storage spot.
    ///
    /// Stale users are dropped first. A member already listed has its action and timestamp
    /// refreshed in place; a new member is admitted while fewer than `storage_max_users` are
    /// present.
    pub fn acquire_storage(
        &mut self,
        target: EntityId,
        member: u64,
        action: StorageAction,
        now: f64,
    ) -> Claim {
        let key = TaskKind::Storage.key(target);
        let existing = self.storage_record(&key);
        let created = existing.is_none();
        let mut record = existing.unwrap_or_default();
        let before = record.users.len();
        record
            .users
            .retain(|u| !self.config.is_stale(u.start_time, now));
        let dropped = record.users.len() != before;

        let claim = if let Some(i) = record.position(member) {
            record.users[i].action = action;
            record.users[i].start_time = now;
            Claim::AlreadyAssigned
        } else if record.users.len() < self.config.storage_max_users {
            record.users.push(StorageUser {
                member_id: member,
                action,
                start_time: now,
            });
            if created {
                Claim::Created
            } else {
                Claim::Joined
            }
        } else {
            Claim::Rejected
        };

        if record.users.is_empty() {
            self.blackboard.delete(&key);
        } else if claim.is_granted() || dropped {
            self.blackboard.set(key, record.to_value());
        }
        tracing::debug!(target, member, action = action.as_str(), ?claim, "acquire storage");
        claim
    }

    pub fn release_storage(&mut self, target: EntityId, member: u64) -> bool {
        let key = TaskKind::Storage.key(target);
        let Some(mut record) = self.storage_record(&key) else {
            return false;
        };
        let Some(i) = record.position(member) else {
            return false;
        };
        record.users.remove(i);
        if record.users.is_empty() {
            self.blackboard.delete(&key);
        } else {
            self.blackboard.set(key, record.to_value());
        }
        tracing::debug!(target, member, "release storage");
        true
    }

    /// Live users of a storage spot, in arrival order.
    pub fn storage_users(&self, target: EntityId, now: f64) -> Vec<StorageUser> {
        self.storage_record(&TaskKind::Storage.key(target))
            .map(|r| {
                r.users
                    .into_iter()
                    .filter(|u| !self.config.is_stale(u.start_time, now))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn ledger_keys(&self) -> Vec<String> {
        self.blackboard
            .keys_with_prefix(LEDGER_PREFIX)
            .map(str::to_string)
            .collect()
    }

    /// Delete stale records, stale storage users and unreadable entries. Returns how many records
    /// were deleted.
    pub fn sweep_stale(&mut self, now: f64) -> usize {
        let mut removed = 0;
        for key in self.ledger_keys() {
            let Some((kind, _)) = TaskKind::parse_key(&key) else {
                continue;
            };
            let Some(value) = self.blackboard.get(&key) else {
                continue;
            };

            let replacement = match kind {
                TaskKind::Hunt | TaskKind::Attack => CapacityRecord::from_value(value)
                    .map(|r| (!self.config.is_stale(r.start_time, now)).then(|| r.to_value())),
                TaskKind::Gather | TaskKind::Plant => SingleRecord::from_value(value)
                    .map(|r| (!self.config.is_stale(r.start_time, now)).then(|| r.to_value())),
                TaskKind::Storage => StorageRecord::from_value(value).map(|mut r| {
                    r.users.retain(|u| !self.config.is_stale(u.start_time, now));
                    (!r.users.is_empty()).then(|| r.to_value())
                }),
            };

            match replacement {
                Some(Some(value)) => self.blackboard.set(key, value),
                // Stale, emptied or unreadable.
                Some(None) | None => {
                    self.blackboard.delete(&key);
                    removed += 1;
                }
            }
        }
        if removed > 0 {
            tracing::debug!(removed, now, "swept stale task records");
        }
        removed
    }

    /// Remove `member` from every record it appears in. Returns how many records changed.
    pub fn remove_member(&mut self, member: u64) -> usize {
        let mut touched = 0;
        for key in self.ledger_keys() {
            let Some((kind, _)) = TaskKind::parse_key(&key) else {
                continue;
            };
            let Some(value) = self.blackboard.get(&key) else {
                continue;
            };

            let update: Option<Option<BbValue>> = match kind {
                TaskKind::Hunt | TaskKind::Attack => {
                    CapacityRecord::from_value(value).and_then(|mut r| {
                        let before = r.member_ids.len();
                        r.member_ids.retain(|&m| m != member);
                        (r.member_ids.len() != before)
                            .then(|| (!r.member_ids.is_empty()).then(|| r.to_value()))
                    })
                }
                TaskKind::Gather | TaskKind::Plant => SingleRecord::from_value(value)
                    .filter(|r| r.member_id == member)
                    .map(|_| None),
                TaskKind::Storage => StorageRecord::from_value(value).and_then(|mut r| {
                    let i = r.position(member)?;
                    r.users.remove(i);
                    Some((!r.users.is_empty()).then(|| r.to_value()))
                }),
            };

            match update {
                Some(Some(value)) => {
                    self.blackboard.set(key, value);
                    touched += 1;
                }
                Some(None) => {
                    self.blackboard.delete(&key);
                    touched += 1;
                }
                None => {}
            }
        }
        if touched > 0 {
            tracing::debug!(member, touched, "removed member from task ledger");
        }
        touched
    }
}
