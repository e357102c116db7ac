use crate::blackboard::BlackboardError;

/// A programming error raised while ticking one agent.
///
/// Expected outcomes such as "no target found" are `BtStatus::Failure`, never a `TickError`.
/// The brain driver contains a `TickError` to the agent that raised it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickError {
    #[error(transparent)]
    Blackboard(#[from] BlackboardError),

    #[error("agent {0} is not present in the world")]
    MissingAgent(u64),

    #[error("blackboard for agent {0} is not available")]
    MissingBlackboard(u64),

    #[error("node `{node}` failed: {message}")]
    Leaf { node: String, message: String },
}

impl TickError {
    pub fn leaf(node: impl Into<String>, message: impl Into<String>) -> Self {
        TickError::Leaf {
            node: node.into(),
            message: message.into(),
        }
    }
}
