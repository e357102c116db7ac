use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{AgentId, BtStatus, Policy, TickContext, TickError, WorldMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BrainConfig {
    pub think_every_ticks: u32,
    pub think_offset_ticks: u32,
    /// Restore the agent's blackboard to its pre-tick state when the tick fails with an error.
    pub rollback_on_error: bool,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            think_every_ticks: 1,
            think_offset_ticks: 0,
            rollback_on_error: true,
        }
    }
}

impl BrainConfig {
    pub fn deterministic(agent: impl AgentId, think_every_ticks: u32) -> Self {
        let every = think_every_ticks.max(1);
        let offset = (agent.stable_id() % (every as u64)) as u32;
        Self {
            think_every_ticks: every,
            think_offset_ticks: offset,
            ..Self::default()
        }
    }

    pub fn should_think(&self, tick: u64) -> bool {
        let every = self.think_every_ticks.max(1) as u64;
        ((tick + (self.think_offset_ticks as u64)) % every) == 0
    }
}

/// Result of one agent's tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentTick<A> {
    pub agent: A,
    pub status: BtStatus,
    pub note: Option<String>,
    pub error: Option<TickError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickReport<A> {
    pub tick: u64,
    pub agents: Vec<AgentTick<A>>,
}

impl<A: AgentId> TickReport<A> {
    pub fn status_of(&self, agent: A) -> Option<BtStatus> {
        self.agents
            .iter()
            .find(|t| t.agent == agent)
            .map(|t| t.status)
    }

    pub fn errors(&self) -> impl Iterator<Item = (A, &TickError)> {
        self.agents
            .iter()
            .filter_map(|t| t.error.as_ref().map(|e| (t.agent, e)))
    }
}

pub struct Brain<W>
where
    W: WorldMut + 'static,
{
    pub agent: W::Agent,
    pub config: BrainConfig,
    pub policy: Rc<dyn Policy<W>>,
    last: BtStatus,
}

impl<W> Brain<W>
where
    W: WorldMut + 'static,
{
    pub fn new(agent: W::Agent, policy: Rc<dyn Policy<W>>) -> Self {
        Self {
            agent,
            config: BrainConfig::default(),
            policy,
            last: BtStatus::NotEvaluated,
        }
    }

    pub fn with_config(mut self, config: BrainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn last_status(&self) -> BtStatus {
        self.last
    }

    /// Evaluate the policy for this agent. Returns `None` when the agent does not think this tick.
    ///
    /// Errors are contained: the agent reports `Failure` for the tick, its blackboard is rolled
    /// back if configured, and nothing is propagated to the caller.
    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) -> Option<AgentTick<W::Agent>> {
        if !self.config.should_think(ctx.tick) {
            return None;
        }

        let id = self.agent.stable_id();
        let Some(mut blackboard) = world.take_blackboard(self.agent) else {
            tracing::warn!(agent = id, tick = ctx.tick, "agent has no blackboard; skipping tick");
            self.last = BtStatus::Failure;
            return Some(AgentTick {
                agent: self.agent,
                status: BtStatus::Failure,
                note: None,
                error: Some(TickError::MissingBlackboard(id)),
            });
        };

        let snapshot = self.config.rollback_on_error.then(|| blackboard.clone());
        let result = self.policy.tick(ctx, self.agent, world, &mut blackboard);

        let report = match result {
            Ok(outcome) => {
                tracing::trace!(
                    agent = id,
                    tick = ctx.tick,
                    status = outcome.status.as_str(),
                    note = outcome.note.as_deref().unwrap_or(""),
                    "agent ticked"
                );
                AgentTick {
                    agent: self.agent,
                    status: outcome.status,
                    note: outcome.note,
                    error: None,
                }
            }
            Err(err) => {
                tracing::warn!(agent = id, tick = ctx.tick, error = %err, "agent tick failed");
                if let Some(snapshot) = snapshot {
                    blackboard = snapshot;
                }
                AgentTick {
                    agent: self.agent,
                    status: BtStatus::Failure,
                    note: None,
                    error: Some(err),
                }
            }
        };

        world.put_blackboard(self.agent, blackboard);
        self.last = report.status;
        Some(report)
    }
}

/// Tick every brain in stable id order.
///
/// Order matters: when agents contend for a capacity-limited task in the same tick, the agent
/// with the lower id claims first.
pub fn tick_brains<W>(
    ctx: &TickContext,
    world: &mut W,
    brains: &mut [Brain<W>],
) -> TickReport<W::Agent>
where
    W: WorldMut + 'static,
{
    brains.sort_by_key(|b| b.agent.stable_id());
    let mut agents = Vec::with_capacity(brains.len());
    for brain in brains.iter_mut() {
        if world.control_mut(brain.agent).is_none() {
            continue;
        }
        if let Some(tick) = brain.tick(ctx, world) {
            agents.push(tick);
        }
    }
    TickReport {
        tick: ctx.tick,
        agents,
    }
}
