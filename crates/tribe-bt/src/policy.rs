use tribe_core::{Blackboard, NodeOutcome, Policy, TickContext, TickError, WorldMut};

use crate::tree::BehaviorTree;

impl<W> Policy<W> for BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    fn tick(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Result<NodeOutcome, TickError> {
        let outcome = BehaviorTree::tick(self, ctx, agent, world, blackboard)?;
        if outcome.status.is_terminal() {
            self.reset(blackboard);
        }
        Ok(outcome)
    }
}
