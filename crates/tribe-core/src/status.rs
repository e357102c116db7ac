use crate::value::{BbValue, FromBbValue};

/// Universal return contract of every behavior-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BtStatus {
    Success,
    Failure,
    Running,
    /// Initial value before a node has executed for an agent.
    #[default]
    NotEvaluated,
}

impl BtStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BtStatus::Success => "success",
            BtStatus::Failure => "failure",
            BtStatus::Running => "running",
            BtStatus::NotEvaluated => "not_evaluated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(BtStatus::Success),
            "failure" => Some(BtStatus::Failure),
            "running" => Some(BtStatus::Running),
            "not_evaluated" => Some(BtStatus::NotEvaluated),
            _ => None,
        }
    }

    /// `Success` or `Failure`: the node is done for this tick.
    pub fn is_terminal(self) -> bool {
        matches!(self, BtStatus::Success | BtStatus::Failure)
    }
}

impl From<bool> for BtStatus {
    fn from(value: bool) -> Self {
        if value {
            BtStatus::Success
        } else {
            BtStatus::Failure
        }
    }
}

impl From<BtStatus> for BbValue {
    fn from(value: BtStatus) -> Self {
        BbValue::Text(value.as_str().to_string())
    }
}

impl FromBbValue for BtStatus {
    const EXPECTED: &'static str = "status";

    fn from_bb(value: &BbValue) -> Option<Self> {
        value.as_text().and_then(BtStatus::parse)
    }
}

/// A node's status plus an optional diagnostic note.
///
/// The note is for tracing and debugging only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeOutcome {
    pub status: BtStatus,
    pub note: Option<String>,
}

impl NodeOutcome {
    pub fn new(status: BtStatus) -> Self {
        Self { status, note: None }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn success() -> Self {
        Self::new(BtStatus::Success)
    }

    pub fn failure() -> Self {
        Self::new(BtStatus::Failure)
    }

    pub fn running() -> Self {
        Self::new(BtStatus::Running)
    }
}

impl From<BtStatus> for NodeOutcome {
    fn from(status: BtStatus) -> Self {
        NodeOutcome::new(status)
    }
}

impl From<(BtStatus, &str)> for NodeOutcome {
    fn from((status, note): (BtStatus, &str)) -> Self {
        NodeOutcome::new(status).with_note(note)
    }
}

impl From<(BtStatus, String)> for NodeOutcome {
    fn from((status, note): (BtStatus, String)) -> Self {
        NodeOutcome::new(status).with_note(note)
    }
}
