//! Deterministic, engine-agnostic kernel primitives for tribe agents.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod blackboard;
pub mod brain;
pub mod control;
pub mod error;
pub mod policy;
pub mod status;
pub mod tick;
pub mod value;
pub mod world;

pub use agent::{AgentId, AgentTable, EntityId};
pub use blackboard::{Blackboard, BlackboardError};
pub use brain::{tick_brains, AgentTick, Brain, BrainConfig, TickReport};
pub use control::{ActiveAction, AgentControl, Target};
pub use error::TickError;
pub use policy::Policy;
pub use status::{BtStatus, NodeOutcome};
pub use tick::TickContext;
pub use value::{BbValue, FromBbValue, Vec2};
pub use world::{MapSize, WorldMut, WorldView};
