//! Ledger record shapes and their blackboard encoding.
//!
//! Records are stored as [`BbValue::Map`] with camelCase fields (`memberId`, `memberIds`,
//! `startTime`, `maxAssignments`, `users`, `action`). Decoding never fails loudly: a value that
//! does not have the expected shape decodes to `None` and is treated as if no record existed.
//!
//! Member ids are written as decimal text so the full `u64` range survives the round trip; an
//! integral number is still accepted on read when it is exactly representable.

use std::collections::BTreeMap;

use tribe_core::{BbValue, FromBbValue};

const MEMBER_ID: &str = "memberId";
const MEMBER_IDS: &str = "memberIds";
const START_TIME: &str = "startTime";
const MAX_ASSIGNMENTS: &str = "maxAssignments";
const USERS: &str = "users";
const ACTION: &str = "action";

fn field<'a>(map: &'a BTreeMap<String, BbValue>, name: &str) -> Option<&'a BbValue> {
    map.get(name)
}

fn member_id(id: u64) -> BbValue {
    BbValue::Text(id.to_string())
}

fn parse_member_id(value: &BbValue) -> Option<u64> {
    match value {
        BbValue::Text(s) => s.parse().ok(),
        other => other.as_id(),
    }
}

fn time(map: &BTreeMap<String, BbValue>) -> Option<f64> {
    field(map, START_TIME)?
        .as_number()
        .filter(|t| t.is_finite())
}

/// Multi-assignee claim (hunt, attack).
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityRecord {
    pub member_ids: Vec<u64>,
    pub start_time: f64,
    pub max_assignments: usize,
}

impl CapacityRecord {
    pub fn new(member: u64, start_time: f64, max_assignments: usize) -> Self {
        Self {
            member_ids: vec![member],
            start_time,
            max_assignments,
        }
    }

    pub fn contains(&self, member: u64) -> bool {
        self.member_ids.contains(&member)
    }

    pub fn is_full(&self) -> bool {
        self.member_ids.len() >= self.max_assignments
    }

    pub fn from_value(value: &BbValue) -> Option<Self> {
        let map = value.as_map()?;
        let member_ids = field(map, MEMBER_IDS)?
            .as_list()?
            .iter()
            .map(parse_member_id)
            .collect::<Option<Vec<_>>>()?;
        let max_assignments = usize::try_from(field(map, MAX_ASSIGNMENTS)?.as_id()?).ok()?;
        Some(Self {
            member_ids,
            start_time: time(map)?,
            max_assignments,
        })
    }

    pub fn to_value(&self) -> BbValue {
        let mut map = BTreeMap::new();
        map.insert(
            MEMBER_IDS.to_string(),
            BbValue::List(self.member_ids.iter().copied().map(member_id).collect()),
        );
        map.insert(START_TIME.to_string(), self.start_time.into());
        map.insert(MAX_ASSIGNMENTS.to_string(), self.max_assignments.into());
        BbValue::Map(map)
    }
}

/// Exclusive claim (gather, plant).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleRecord {
    pub member_id: u64,
    pub start_time: f64,
}

impl SingleRecord {
    pub fn from_value(value: &BbValue) -> Option<Self> {
        let map = value.as_map()?;
        Some(Self {
            member_id: parse_member_id(field(map, MEMBER_ID)?)?,
            start_time: time(map)?,
        })
    }

    pub fn to_value(&self) -> BbValue {
        let mut map = BTreeMap::new();
        map.insert(MEMBER_ID.to_string(), member_id(self.member_id));
        map.insert(START_TIME.to_string(), self.start_time.into());
        BbValue::Map(map)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageAction {
    Store,
    Retrieve,
}

impl StorageAction {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageAction::Store => "store",
            StorageAction::Retrieve => "retrieve",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "store" => Some(StorageAction::Store),
            "retrieve" => Some(StorageAction::Retrieve),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageUser {
    pub member_id: u64,
    pub action: StorageAction,
    pub start_time: f64,
}

impl StorageUser {
    fn from_value(value: &BbValue) -> Option<Self> {
        let map = value.as_map()?;
        Some(Self {
            member_id: parse_member_id(field(map, MEMBER_ID)?)?,
            action: StorageAction::parse(field(map, ACTION)?.as_text()?)?,
            start_time: time(map)?,
        })
    }

    fn to_value(self) -> BbValue {
        let mut map = BTreeMap::new();
        map.insert(MEMBER_ID.to_string(), member_id(self.member_id));
        map.insert(ACTION.to_string(), self.action.as_str().into());
        map.insert(START_TIME.to_string(), self.start_time.into());
        BbValue::Map(map)
    }
}

/// Users of one storage spot, in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageRecord {
    pub users: Vec<StorageUser>,
}

impl StorageRecord {
    pub fn position(&self, member: u64) -> Option<usize> {
        self.users.iter().position(|u| u.member_id == member)
    }

    pub fn from_value(value: &BbValue) -> Option<Self> {
        let map = value.as_map()?;
        let users = field(map, USERS)?
            .as_list()?
            .iter()
            .map(StorageUser::from_value)
            .collect::<Option<Vec<_>>>()?;
        Some(Self { users })
    }

    pub fn to_value(&self) -> BbValue {
        let mut map = BTreeMap::new();
        map.insert(
            USERS.to_string(),
            BbValue::List(self.users.iter().map(|u| u.to_value()).collect()),
        );
        BbValue::Map(map)
    }
}

impl FromBbValue for CapacityRecord {
    const EXPECTED: &'static str = "capacity task record";

    fn from_bb(value: &BbValue) -> Option<Self> {
        Self::from_value(value)
    }
}

impl FromBbValue for SingleRecord {
    const EXPECTED: &'static str = "single task record";

    fn from_bb(value: &BbValue) -> Option<Self> {
        Self::from_value(value)
    }
}

impl FromBbValue for StorageRecord {
    const EXPECTED: &'static str = "storage record";

    fn from_bb(value: &BbValue) -> Option<Self> {
        Self::from_value(value)
    }
}
