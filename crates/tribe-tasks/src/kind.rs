use tribe_core::EntityId;

/// Every ledger key starts with this prefix.
pub const LEDGER_PREFIX: &str = "tribal_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskKind {
    Hunt,
    Attack,
    Gather,
    Plant,
    Storage,
}

impl TaskKind {
    pub const ALL: [TaskKind; 5] = [
        TaskKind::Hunt,
        TaskKind::Attack,
        TaskKind::Gather,
        TaskKind::Plant,
        TaskKind::Storage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Hunt => "hunt",
            TaskKind::Attack => "attack",
            TaskKind::Gather => "gather",
            TaskKind::Plant => "plant",
            TaskKind::Storage => "storage",
        }
    }

    /// `tribal_<kind>_<target>`
    pub fn key(self, target: EntityId) -> String {
        format!("{LEDGER_PREFIX}{}_{target}", self.as_str())
    }

    pub fn parse_key(key: &str) -> Option<(TaskKind, EntityId)> {
        let rest = key.strip_prefix(LEDGER_PREFIX)?;
        let (kind, target) = rest.split_once('_')?;
        let kind = TaskKind::ALL.into_iter().find(|k| k.as_str() == kind)?;
        Some((kind, target.parse().ok()?))
    }
}

/// Tasks that admit several assignees up to a capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapacityTask {
    Hunt,
    Attack,
}

impl CapacityTask {
    pub fn kind(self) -> TaskKind {
        match self {
            CapacityTask::Hunt => TaskKind::Hunt,
            CapacityTask::Attack => TaskKind::Attack,
        }
    }
}

/// Tasks with at most one assignee per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingleTask {
    Gather,
    Plant,
}

impl SingleTask {
    pub fn kind(self) -> TaskKind {
        match self {
            SingleTask::Gather => TaskKind::Gather,
            SingleTask::Plant => TaskKind::Plant,
        }
    }
}
