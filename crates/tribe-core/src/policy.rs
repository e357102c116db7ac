use crate::{Blackboard, NodeOutcome, TickContext, TickError, WorldMut};

/// Decision logic evaluated once per agent per thinking tick.
///
/// Policies are shared between agents (`&self`): everything that must survive between ticks for
/// one agent lives on that agent's blackboard.
pub trait Policy<W>: 'static
where
    W: WorldMut + 'static,
{
    fn tick(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Result<NodeOutcome, TickError>;
}
