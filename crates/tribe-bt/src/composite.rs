use tribe_core::{Blackboard, BtStatus, NodeOutcome, TickContext, WorldMut};

use crate::node::{keys, record_status, BoxedNode, BtNode, NodeKind, NodeResult};

/// Memory sequence (AND).
///
/// Resumes at the child that was `Running` on the previous tick. Children before the stored
/// index are not re-evaluated on resume, so a move that has started is not aborted because a
/// precondition flickered. Use [`ReactiveSequence`] when every condition must hold on every tick.
pub struct Sequence<W>
where
    W: WorldMut + 'static,
{
    name: String,
    children: Vec<BoxedNode<W>>,
}

impl<W> Sequence<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<String>, children: Vec<BoxedNode<W>>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

impl<W> BtNode<W> for Sequence<W>
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    fn children(&self) -> Vec<&dyn BtNode<W>> {
        self.children.iter().map(|c| &**c).collect()
    }

    fn tick(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> NodeResult {
        let index_key = keys::running_child_index(&self.name);
        let start = blackboard
            .get_as::<usize>(&index_key)?
            .filter(|&i| i < self.children.len())
            .unwrap_or(0);

        let mut note = None;
        for (i, child) in self.children.iter().enumerate().skip(start) {
            let outcome = child.tick(ctx, agent, world, blackboard)?;
            match outcome.status {
                BtStatus::Success => note = outcome.note,
                BtStatus::Running => {
                    blackboard.set(index_key, i);
                    record_status(blackboard, &self.name, BtStatus::Running);
                    return Ok(outcome);
                }
                BtStatus::Failure | BtStatus::NotEvaluated => {
                    self.reset(blackboard);
                    record_status(blackboard, &self.name, BtStatus::Failure);
                    return Ok(NodeOutcome {
                        status: BtStatus::Failure,
                        note: outcome.note,
                    });
                }
            }
        }

        self.reset(blackboard);
        record_status(blackboard, &self.name, BtStatus::Success);
        Ok(NodeOutcome {
            status: BtStatus::Success,
            note,
        })
    }

    fn reset(&self, blackboard: &mut Blackboard) {
        blackboard.delete(&keys::running_child_index(&self.name));
        for child in &self.children {
            child.reset(blackboard);
        }
    }
}

/// Reactive sequence (AND): re-evaluates from the first child on every tick.
///
/// When the running child changes, the previously running child is reset.
pub struct ReactiveSequence<W>
where
    W: WorldMut + 'static,
{
    name: String,
    children: Vec<BoxedNode<W>>,
}

impl<W> ReactiveSequence<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<String>, children: Vec<BoxedNode<W>>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

impl<W> BtNode<W> for ReactiveSequence<W>
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::ReactiveSequence
    }

    fn children(&self) -> Vec<&dyn BtNode<W>> {
        self.children.iter().map(|c| &**c).collect()
    }

    fn tick(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> NodeResult {
        let index_key = keys::running_child_index(&self.name);
        let previous = blackboard.get_as::<usize>(&index_key)?;

        let mut note = None;
        for (i, child) in self.children.iter().enumerate() {
            let outcome = child.tick(ctx, agent, world, blackboard)?;
            match outcome.status {
                BtStatus::Success => note = outcome.note,
                BtStatus::Running => {
                    if let Some(prev) = previous.filter(|&p| p != i) {
                        if let Some(stale) = self.children.get(prev) {
                            stale.reset(blackboard);
                        }
                    }
                    blackboard.set(index_key, i);
                    record_status(blackboard, &self.name, BtStatus::Running);
                    return Ok(outcome);
                }
                BtStatus::Failure | BtStatus::NotEvaluated => {
                    self.reset(blackboard);
                    record_status(blackboard, &self.name, BtStatus::Failure);
                    return Ok(NodeOutcome {
                        status: BtStatus::Failure,
                        note: outcome.note,
                    });
                }
            }
        }

        self.reset(blackboard);
        record_status(blackboard, &self.name, BtStatus::Success);
        Ok(NodeOutcome {
            status: BtStatus::Success,
            note,
        })
    }

    fn reset(&self, blackboard: &mut Blackboard) {
        blackboard.delete(&keys::running_child_index(&self.name));
        for child in &self.children {
            child.reset(blackboard);
        }
    }
}

/// Priority selector (OR).
///
/// Scans from the first child on every tick; the first `Success` or `Running` child wins. When
/// priority moves to a different child than the one running last tick, the abandoned branch is
/// reset so it starts from scratch the next time it is chosen.
pub struct Selector<W>
where
    W: WorldMut + 'static,
{
    name: String,
    children: Vec<BoxedNode<W>>,
}

impl<W> Selector<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<String>, children: Vec<BoxedNode<W>>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

impl<W> BtNode<W> for Selector<W>
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Selector
    }

    fn children(&self) -> Vec<&dyn BtNode<W>> {
        self.children.iter().map(|c| &**c).collect()
    }

    fn tick(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> NodeResult {
        let index_key = keys::running_child_index(&self.name);
        let previous = blackboard.get_as::<usize>(&index_key)?;

        let mut note = None;
        for (i, child) in self.children.iter().enumerate() {
            let outcome = child.tick(ctx, agent, world, blackboard)?;
            match outcome.status {
                BtStatus::Failure | BtStatus::NotEvaluated => note = outcome.note,
                BtStatus::Success => {
                    self.reset(blackboard);
                    record_status(blackboard, &self.name, BtStatus::Success);
                    return Ok(outcome);
                }
                BtStatus::Running => {
                    if let Some(prev) = previous.filter(|&p| p != i) {
                        if let Some(stale) = self.children.get(prev) {
                            stale.reset(blackboard);
                        }
                    }
                    blackboard.set(index_key, i);
                    record_status(blackboard, &self.name, BtStatus::Running);
                    return Ok(outcome);
                }
            }
        }

        self.reset(blackboard);
        record_status(blackboard, &self.name, BtStatus::Failure);
        Ok(NodeOutcome {
            status: BtStatus::Failure,
            note,
        })
    }

    fn reset(&self, blackboard: &mut Blackboard) {
        blackboard.delete(&keys::running_child_index(&self.name));
        for child in &self.children {
            child.reset(blackboard);
        }
    }
}
