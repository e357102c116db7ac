use std::marker::PhantomData;

use tribe_core::{Blackboard, BtStatus, NodeOutcome, TickContext, WorldMut};

use crate::node::{BtNode, IntoCheck, IntoNodeResult, NodeKind, NodeResult};

/// Leaf that performs a world-visible side effect.
///
/// The closure runs every tick the leaf is reached, including while it keeps returning
/// `Running`, so it must be safe to call repeatedly.
pub struct Action<W, F> {
    name: String,
    run: F,
    _world: PhantomData<fn(&mut W)>,
}

impl<W, F, R> Action<W, F>
where
    W: WorldMut + 'static,
    F: Fn(&TickContext, W::Agent, &mut W, &mut Blackboard) -> R + 'static,
    R: IntoNodeResult,
{
    pub fn new(name: impl Into<String>, run: F) -> Self {
        Self {
            name: name.into(),
            run,
            _world: PhantomData,
        }
    }
}

impl<W, F, R> BtNode<W> for Action<W, F>
where
    W: WorldMut + 'static,
    F: Fn(&TickContext, W::Agent, &mut W, &mut Blackboard) -> R + 'static,
    R: IntoNodeResult,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Action
    }

    fn tick(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> NodeResult {
        (self.run)(ctx, agent, world, blackboard).into_node_result()
    }
}

/// Predicate leaf, coerced to `Success`/`Failure`.
///
/// Only a shared world reference is handed out, so a condition cannot set the agent's action or
/// target. It may leave scratch values on the blackboard for the action that follows it.
pub struct Condition<W, F> {
    name: String,
    check: F,
    _world: PhantomData<fn(&W)>,
}

impl<W, F, R> Condition<W, F>
where
    W: WorldMut + 'static,
    F: Fn(&TickContext, W::Agent, &W, &mut Blackboard) -> R + 'static,
    R: IntoCheck,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
            _world: PhantomData,
        }
    }
}

impl<W, F, R> BtNode<W> for Condition<W, F>
where
    W: WorldMut + 'static,
    F: Fn(&TickContext, W::Agent, &W, &mut Blackboard) -> R + 'static,
    R: IntoCheck,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Condition
    }

    fn tick(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> NodeResult {
        let (passed, note) = (self.check)(ctx, agent, &*world, blackboard).into_check()?;
        Ok(NodeOutcome {
            status: BtStatus::from(passed),
            note,
        })
    }
}
