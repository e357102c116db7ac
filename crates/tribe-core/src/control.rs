use crate::agent::EntityId;
use crate::value::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The action an agent is currently performing, read by the interaction systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ActiveAction {
    #[default]
    Idle,
    Moving,
    Eating,
    Gathering,
    Planting,
    Attacking,
    Throwing,
    Chopping,
    DestroyingBuilding,
    Fleeing,
    Storing,
    Retrieving,
    Sleeping,
}

impl ActiveAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ActiveAction::Idle => "idle",
            ActiveAction::Moving => "moving",
            ActiveAction::Eating => "eating",
            ActiveAction::Gathering => "gathering",
            ActiveAction::Planting => "planting",
            ActiveAction::Attacking => "attacking",
            ActiveAction::Throwing => "throwing",
            ActiveAction::Chopping => "chopping",
            ActiveAction::DestroyingBuilding => "destroyingBuilding",
            ActiveAction::Fleeing => "fleeing",
            ActiveAction::Storing => "storing",
            ActiveAction::Retrieving => "retrieving",
            ActiveAction::Sleeping => "sleeping",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Target {
    Position(Vec2),
    Entity(EntityId),
}

/// Agent fields written by action leaves.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentControl {
    pub active_action: ActiveAction,
    /// Unit vector or zero.
    pub direction: Vec2,
    pub target: Option<Target>,
    pub attack_target_id: Option<EntityId>,
    pub throw_target_id: Option<EntityId>,
}

impl AgentControl {
    /// Back to idle: no heading, no targets.
    pub fn reset_to_idle(&mut self) {
        *self = AgentControl::default();
    }

    pub fn perform(&mut self, action: ActiveAction, target: Option<Target>) {
        self.active_action = action;
        self.direction = Vec2::ZERO;
        self.target = target;
    }

    /// Start moving along `direction` towards `target`. The heading is normalized.
    pub fn move_towards(&mut self, target: Target, direction: Vec2) {
        self.active_action = ActiveAction::Moving;
        self.direction = direction.normalized();
        self.target = Some(target);
    }
}
