use tribe_core::WorldView;

/// Family and tribe relations supplied by the host world.
pub trait Kinship: WorldView {
    fn tribe_leader(&self, agent: Self::Agent) -> Option<Self::Agent>;

    fn is_adult(&self, agent: Self::Agent) -> bool;

    fn has_family(&self, agent: Self::Agent) -> bool;

    fn father(&self, agent: Self::Agent) -> Option<Self::Agent>;

    /// The agent owns a blackboard, even if it is checked out for a tick right now.
    fn has_blackboard(&self, agent: Self::Agent) -> bool;
}

/// Agent whose blackboard holds the task ledger `agent` must consult.
///
/// Tribe leader first, then the agent itself when it is an adult with a family, then a child's
/// father. `None` means the agent coordinates with nobody and every claim succeeds.
pub fn resolve_coordination_point<W: Kinship>(world: &W, agent: W::Agent) -> Option<W::Agent> {
    if let Some(leader) = world.tribe_leader(agent) {
        if world.has_blackboard(leader) {
            return Some(leader);
        }
    }
    if world.is_adult(agent) {
        return world.has_family(agent).then_some(agent);
    }
    world.father(agent).filter(|&father| world.has_blackboard(father))
}
