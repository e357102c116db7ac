use crate::agent::EntityId;
use crate::control::AgentControl;
use crate::value::Vec2;
use crate::{AgentId, Blackboard};

/// Toroidal map dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSize {
    pub width: f32,
    pub height: f32,
}

impl MapSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn wrap(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.rem_euclid(self.width), p.y.rem_euclid(self.height))
    }

    /// Shortest displacement from `from` to `to`, crossing the map edges when that is shorter.
    pub fn wrapped_delta(&self, from: Vec2, to: Vec2) -> Vec2 {
        let mut dx = to.x - from.x;
        let mut dy = to.y - from.y;
        if dx.abs() > self.width / 2.0 {
            dx -= self.width.copysign(dx);
        }
        if dy.abs() > self.height / 2.0 {
            dy -= self.height.copysign(dy);
        }
        Vec2::new(dx, dy)
    }

    pub fn distance(&self, a: Vec2, b: Vec2) -> f32 {
        self.wrapped_delta(a, b).length()
    }
}

/// Read-only world access.
///
/// The kernel performs no spatial queries itself; leaves use world-specific extension traits for
/// nearest-entity lookups.
pub trait WorldView {
    type Agent: AgentId;

    fn map_size(&self) -> MapSize;

    fn entity_exists(&self, id: EntityId) -> bool;

    /// Living agents, in any order. The driver sorts them.
    fn agents(&self) -> Vec<Self::Agent>;
}

/// Write access: agent control fields and per-agent blackboards.
///
/// Blackboards are owned by the world so a leaf ticking for one agent can reach the ledger kept
/// on another agent's blackboard. While an agent is being ticked, its blackboard is checked out
/// with [`WorldMut::take_blackboard`] and `blackboard_mut` returns `None` for it.
pub trait WorldMut: WorldView {
    fn control_mut(&mut self, agent: Self::Agent) -> Option<&mut AgentControl>;

    fn blackboard_mut(&mut self, agent: Self::Agent) -> Option<&mut Blackboard>;

    fn take_blackboard(&mut self, agent: Self::Agent) -> Option<Blackboard>;

    fn put_blackboard(&mut self, agent: Self::Agent, blackboard: Blackboard);
}
