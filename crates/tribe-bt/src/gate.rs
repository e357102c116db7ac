use tribe_core::{Blackboard, NodeOutcome, TickContext, WorldMut, WorldView};

use crate::node::{BoxedNode, BtNode, NodeKind, NodeResult};

/// Control flags supplied by the host (player input, autopilot toggles).
pub trait ControlFlags: WorldView {
    /// The player is steering this agent directly.
    fn is_manually_controlled(&self, agent: Self::Agent) -> bool;

    /// This agent is the player's avatar (whether or not it is being steered right now).
    fn is_player_controlled(&self, agent: Self::Agent) -> bool;

    /// The player delegated `behavior` (e.g. `"gather"`, `"attack"`) to the autopilot.
    fn autopilot_enabled(&self, agent: Self::Agent, behavior: &str) -> bool;
}

type GatePredicate<W> = Box<dyn Fn(&TickContext, <W as WorldView>::Agent, &W) -> bool>;

/// Skips the child with `Failure` unless an externally supplied predicate allows it.
pub struct Gate<W>
where
    W: WorldMut + 'static,
{
    name: String,
    label: &'static str,
    allow: GatePredicate<W>,
    child: BoxedNode<W>,
}

impl<W> Gate<W>
where
    W: WorldMut + 'static,
{
    pub fn new(
        name: impl Into<String>,
        allow: impl Fn(&TickContext, W::Agent, &W) -> bool + 'static,
        child: BoxedNode<W>,
    ) -> Self {
        Self {
            name: name.into(),
            label: "custom",
            allow: Box::new(allow),
            child,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl<W> Gate<W>
where
    W: WorldMut + ControlFlags + 'static,
{
    /// Passes only while the agent is under direct manual control.
    pub fn manual_control(name: impl Into<String>, child: BoxedNode<W>) -> Self {
        Self {
            label: "manual_control",
            ..Self::new(name, |_, agent, world: &W| world.is_manually_controlled(agent), child)
        }
    }

    /// Passes for NPCs, and for the player's agent only when the autopilot handles `behavior`.
    pub fn autopilot_controlled(
        name: impl Into<String>,
        behavior: &'static str,
        child: BoxedNode<W>,
    ) -> Self {
        Self {
            label: "autopilot_controlled",
            ..Self::new(
                name,
                move |_, agent, world: &W| {
                    !world.is_player_controlled(agent) || world.autopilot_enabled(agent, behavior)
                },
                child,
            )
        }
    }

    /// Passes only for agents the player does not control.
    pub fn non_player_controlled(name: impl Into<String>, child: BoxedNode<W>) -> Self {
        Self {
            label: "non_player_controlled",
            ..Self::new(
                name,
                |_, agent, world: &W| !world.is_player_controlled(agent),
                child,
            )
        }
    }
}

impl<W> BtNode<W> for Gate<W>
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Gate
    }

    fn children(&self) -> Vec<&dyn BtNode<W>> {
        vec![&*self.child]
    }

    fn tick(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> NodeResult {
        if !(self.allow)(ctx, agent, &*world) {
            tracing::trace!(node = %self.name, gate = self.label, tick = ctx.tick, "gate denied");
            return Ok(NodeOutcome::failure().with_note(format!("{} denied", self.label)));
        }
        self.child.tick(ctx, agent, world, blackboard)
    }
}
