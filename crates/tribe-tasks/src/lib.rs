//! Cross-agent task coordination for tribe agents.
//!
//! A coordination point (normally the tribe leader) keeps a ledger of task claims on its own
//! blackboard. Leaves of any agent in the group consult and update that ledger to avoid piling
//! onto the same scarce target. There are no locks: agents are ticked one at a time, claims
//! expire after a fixed timeout, and the agent ticked first wins a contended slot.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod coordinator;
pub mod kind;
pub mod ledger;
pub mod point;
pub mod record;

pub use config::CoordinatorConfig;
pub use coordinator::TaskCoordinator;
pub use kind::{CapacityTask, SingleTask, TaskKind, LEDGER_PREFIX};
pub use ledger::{Claim, TaskLedger};
pub use point::{resolve_coordination_point, Kinship};
pub use record::{CapacityRecord, SingleRecord, StorageAction, StorageRecord, StorageUser};
