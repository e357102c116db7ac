//! Behavior Tree runtime built on `tribe-core`.
//!
//! Trees are built once per agent archetype and shared by every agent of that archetype. Nodes
//! keep no per-agent fields: running indices, cache entries, cooldown and timeout timestamps are
//! stored on the ticking agent's blackboard under keys derived from the node name.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod build;
pub mod composite;
pub mod decorator;
pub mod gate;
pub mod leaf;
pub mod node;
pub mod policy;
pub mod tree;

pub use composite::{ReactiveSequence, Selector, Sequence};
pub use decorator::{Caching, Cooldown, ForceSuccess, Inverter, Timeout};
pub use gate::{ControlFlags, Gate};
pub use leaf::{Action, Condition};
pub use node::{
    keys, last_status, BoxedNode, BtNode, IntoCheck, IntoNodeResult, NodeKind, NodeResult,
};
pub use tree::{BehaviorTree, TreeError, TreeRegistry};
pub use tribe_core::{BtStatus, NodeOutcome, TickError};
