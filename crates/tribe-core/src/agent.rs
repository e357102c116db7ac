use core::fmt::Debug;
use std::collections::BTreeMap;

use crate::control::AgentControl;
use crate::Blackboard;

/// Id of any world entity (agents, bushes, buildings, ...).
pub type EntityId = u64;

/// Stable identifier for an agent.
///
/// Deterministic simulation requires:
/// - stable ordering (`Ord`)
/// - a stable numeric ID (`stable_id`) for ledger entries and logs, mapped back to a handle
///   with `from_stable_id`
pub trait AgentId: Copy + Ord + Eq + Debug + 'static {
    fn stable_id(self) -> u64;

    /// Inverse of `stable_id`; `None` when the id does not fit this handle type.
    fn from_stable_id(id: u64) -> Option<Self>;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }

    fn from_stable_id(id: u64) -> Option<Self> {
        Some(id)
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }

    fn from_stable_id(id: u64) -> Option<Self> {
        u32::try_from(id).ok()
    }
}

impl AgentId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }

    fn from_stable_id(id: u64) -> Option<Self> {
        usize::try_from(id).ok()
    }
}

#[derive(Debug, Clone, Default)]
struct AgentSlot {
    control: AgentControl,
    // `None` while checked out by the driver.
    blackboard: Option<Blackboard>,
}

/// Deterministic storage for agent control fields and blackboards.
///
/// Worlds embed a table and delegate the `WorldMut` blackboard methods to it. A blackboard is
/// created on [`AgentTable::spawn`] and dropped on [`AgentTable::despawn`].
#[derive(Debug, Clone)]
pub struct AgentTable<A: AgentId> {
    slots: BTreeMap<A, AgentSlot>,
}

impl<A: AgentId> Default for AgentTable<A> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<A: AgentId> AgentTable<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, agent: A) {
        self.slots.entry(agent).or_insert_with(|| AgentSlot {
            control: AgentControl::default(),
            blackboard: Some(Blackboard::new()),
        });
    }

    pub fn despawn(&mut self, agent: A) -> bool {
        self.slots.remove(&agent).is_some()
    }

    pub fn contains(&self, agent: A) -> bool {
        self.slots.contains_key(&agent)
    }

    pub fn ids(&self) -> Vec<A> {
        self.slots.keys().copied().collect()
    }

    pub fn control(&self, agent: A) -> Option<&AgentControl> {
        self.slots.get(&agent).map(|s| &s.control)
    }

    pub fn control_mut(&mut self, agent: A) -> Option<&mut AgentControl> {
        self.slots.get_mut(&agent).map(|s| &mut s.control)
    }

    pub fn blackboard(&self, agent: A) -> Option<&Blackboard> {
        self.slots.get(&agent)?.blackboard.as_ref()
    }

    pub fn blackboard_mut(&mut self, agent: A) -> Option<&mut Blackboard> {
        self.slots.get_mut(&agent)?.blackboard.as_mut()
    }

    pub fn take_blackboard(&mut self, agent: A) -> Option<Blackboard> {
        self.slots.get_mut(&agent)?.blackboard.take()
    }

    /// Return a checked-out blackboard. Dropped if the agent despawned meanwhile.
    pub fn put_blackboard(&mut self, agent: A, blackboard: Blackboard) {
        if let Some(slot) = self.slots.get_mut(&agent) {
            slot.blackboard = Some(blackboard);
        }
    }
}
