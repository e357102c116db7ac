use tribe_core::{AgentId, Blackboard, EntityId, WorldMut};

use crate::config::CoordinatorConfig;
use crate::kind::{CapacityTask, SingleTask};
use crate::ledger::{Claim, TaskLedger};
use crate::point::{resolve_coordination_point, Kinship};
use crate::record::{StorageAction, StorageUser};

/// Routes task claims to the ledger of the claiming agent's coordination point.
///
/// Leaves call the coordinator with the world and the blackboard of the agent being ticked. When
/// the coordination point is that agent, its own (checked-out) blackboard is used; otherwise the
/// point's blackboard is borrowed from the world.
#[derive(Debug, Clone, Default)]
pub struct TaskCoordinator {
    config: CoordinatorConfig,
}

impl TaskCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Run `f` against the ledger `agent` coordinates through, or return `None` when there is no
    /// coordination point (or its blackboard is unavailable).
    pub fn with_ledger<W, R>(
        &self,
        world: &mut W,
        agent: W::Agent,
        own: &mut Blackboard,
        f: impl FnOnce(&mut TaskLedger<'_>) -> R,
    ) -> Option<R>
    where
        W: WorldMut + Kinship,
    {
        let point = resolve_coordination_point(world, agent)?;
        let blackboard = if point == agent {
            own
        } else {
            world.blackboard_mut(point)?
        };
        Some(f(&mut TaskLedger::new(blackboard, &self.config)))
    }

    /// See [`TaskLedger::register_task`]. Unconstrained agents always succeed.
    pub fn register_task<W>(
        &self,
        world: &mut W,
        agent: W::Agent,
        own: &mut Blackboard,
        task: CapacityTask,
        target: EntityId,
        now: f64,
    ) -> bool
    where
        W: WorldMut + Kinship,
    {
        let member = agent.stable_id();
        self.with_ledger(world, agent, own, |ledger| {
            ledger.register_task(task, target, member, now)
        })
        .map_or(true, Claim::is_granted)
    }

    pub fn unregister_task<W>(
        &self,
        world: &mut W,
        agent: W::Agent,
        own: &mut Blackboard,
        task: CapacityTask,
        target: EntityId,
    ) -> bool
    where
        W: WorldMut + Kinship,
    {
        let member = agent.stable_id();
        self.with_ledger(world, agent, own, |ledger| {
            ledger.unregister_task(task, target, member)
        })
        .unwrap_or(false)
    }

    /// Agents assigned to the task in `agent`'s ledger. Member ids that no longer map to an agent
    /// handle are dropped.
    pub fn assignees<W>(
        &self,
        world: &mut W,
        agent: W::Agent,
        own: &mut Blackboard,
        task: CapacityTask,
        target: EntityId,
        now: f64,
    ) -> Vec<W::Agent>
    where
        W: WorldMut + Kinship,
    {
        self.with_ledger(world, agent, own, |ledger| ledger.assignees(task, target, now))
            .unwrap_or_default()
            .into_iter()
            .filter_map(<W::Agent as AgentId>::from_stable_id)
            .collect()
    }

    pub fn claim_single<W>(
        &self,
        world: &mut W,
        agent: W::Agent,
        own: &mut Blackboard,
        task: SingleTask,
        target: EntityId,
        now: f64,
    ) -> bool
    where
        W: WorldMut + Kinship,
    {
        let member = agent.stable_id();
        self.with_ledger(world, agent, own, |ledger| {
            ledger.claim_single(task, target, member, now)
        })
        .map_or(true, Claim::is_granted)
    }

    pub fn release_single<W>(
        &self,
        world: &mut W,
        agent: W::Agent,
        own: &mut Blackboard,
        task: SingleTask,
        target: EntityId,
    ) -> bool
    where
        W: WorldMut + Kinship,
    {
        let member = agent.stable_id();
        self.with_ledger(world, agent, own, |ledger| {
            ledger.release_single(task, target, member)
        })
        .unwrap_or(false)
    }

    pub fn acquire_storage<W>(
        &self,
        world: &mut W,
        agent: W::Agent,
        own: &mut Blackboard,
        target: EntityId,
        action: StorageAction,
        now: f64,
    ) -> bool
    where
        W: WorldMut + Kinship,
    {
        let member = agent.stable_id();
        self.with_ledger(world, agent, own, |ledger| {
            ledger.acquire_storage(target, member, action, now)
        })
        .map_or(true, Claim::is_granted)
    }

    pub fn release_storage<W>(
        &self,
        world: &mut W,
        agent: W::Agent,
        own: &mut Blackboard,
        target: EntityId,
    ) -> bool
    where
        W: WorldMut + Kinship,
    {
        let member = agent.stable_id();
        self.with_ledger(world, agent, own, |ledger| {
            ledger.release_storage(target, member)
        })
        .unwrap_or(false)
    }

    pub fn storage_users<W>(
        &self,
        world: &mut W,
        agent: W::Agent,
        own: &mut Blackboard,
        target: EntityId,
        now: f64,
    ) -> Vec<StorageUser>
    where
        W: WorldMut + Kinship,
    {
        self.with_ledger(world, agent, own, |ledger| ledger.storage_users(target, now))
            .unwrap_or_default()
    }

    /// Sweep stale records from every agent's ledger.
    ///
    /// A blackboard checked out by the driver is not reachable through the world; callers inside
    /// a leaf pass the ticking agent's blackboard as `own` so that ledger is swept too.
    pub fn sweep_world<W: WorldMut>(
        &self,
        world: &mut W,
        own: Option<&mut Blackboard>,
        now: f64,
    ) -> usize {
        self.for_each_ledger(world, own, |ledger| ledger.sweep_stale(now))
    }

    /// Remove a dead or departed member from every ledger in the world. `own` is the ticking
    /// agent's blackboard when called from a leaf, as for [`TaskCoordinator::sweep_world`].
    pub fn on_agent_removed<W: WorldMut>(
        &self,
        world: &mut W,
        own: Option<&mut Blackboard>,
        member: W::Agent,
    ) -> usize {
        let id = member.stable_id();
        let touched = self.for_each_ledger(world, own, |ledger| ledger.remove_member(id));
        tracing::debug!(member = id, touched, "agent removed from task ledgers");
        touched
    }

    fn for_each_ledger<W: WorldMut>(
        &self,
        world: &mut W,
        own: Option<&mut Blackboard>,
        mut f: impl FnMut(&mut TaskLedger<'_>) -> usize,
    ) -> usize {
        let mut total = own.map_or(0, |blackboard| {
            f(&mut TaskLedger::new(blackboard, &self.config))
        });
        let mut unavailable = 0;
        for agent in world.agents() {
            match world.blackboard_mut(agent) {
                Some(blackboard) => total += f(&mut TaskLedger::new(blackboard, &self.config)),
                None => unavailable += 1,
            }
        }
        if unavailable > 0 {
            tracing::debug!(unavailable, "checked-out blackboards skipped");
        }
        total
    }
}
