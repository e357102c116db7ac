use tribe_core::{Blackboard, BtStatus, NodeOutcome, TickContext, WorldMut};

use crate::node::{keys, BoxedNode, BtNode, NodeKind, NodeResult};

/// Memoizes the child's outcome for `duration_hours` of simulated time.
///
/// Every status is cached, `Failure` and `Running` included. Do not wrap a search that must be
/// retried every tick while it fails.
pub struct Caching<W>
where
    W: WorldMut + 'static,
{
    name: String,
    duration_hours: f64,
    child: BoxedNode<W>,
}

impl<W> Caching<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<String>, duration_hours: f64, child: BoxedNode<W>) -> Self {
        Self {
            name: name.into(),
            duration_hours,
            child,
        }
    }
}

impl<W> BtNode<W> for Caching<W>
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Caching
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
        let status_key = keys::caching_status(&self.name);
        let note_key = keys::caching_note(&self.name);
        let time_key = keys::caching_time(&self.name);

        let cached = blackboard.get_as::<BtStatus>(&status_key)?;
        let cached_at = blackboard.number(&time_key)?;
        if let (Some(status), Some(at)) = (cached, cached_at) {
            if ctx.elapsed_since(at) <= self.duration_hours {
                return Ok(NodeOutcome {
                    status,
                    note: blackboard.text(&note_key)?,
                });
            }
        }

        let outcome = self.child.tick(ctx, agent, world, blackboard)?;
        blackboard.set(status_key, outcome.status);
        blackboard.set(time_key, ctx.now_hours);
        match &outcome.note {
            Some(note) => blackboard.set(note_key, note.as_str()),
            None => {
                blackboard.delete(&note_key);
            }
        }
        Ok(outcome)
    }
}

/// Rate-limits the child: after a `Success`, the child is not entered again until
/// `duration_hours` have passed; meanwhile the decorator reports `Failure`.
pub struct Cooldown<W>
where
    W: WorldMut + 'static,
{
    name: String,
    duration_hours: f64,
    child: BoxedNode<W>,
}

impl<W> Cooldown<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<String>, duration_hours: f64, child: BoxedNode<W>) -> Self {
        Self {
            name: name.into(),
            duration_hours,
            child,
        }
    }
}

impl<W> BtNode<W> for Cooldown<W>
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Cooldown
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
        let key = keys::cooldown(&self.name);
        if let Some(last_success) = blackboard.number(&key)? {
            let remaining = self.duration_hours - ctx.elapsed_since(last_success);
            if remaining > 0.0 {
                return Ok(NodeOutcome::failure().with_note(format!(
                    "{} cooling down ({remaining:.2}h left)",
                    self.name
                )));
            }
        }

        let outcome = self.child.tick(ctx, agent, world, blackboard)?;
        if outcome.status == BtStatus::Success {
            blackboard.set(key, ctx.now_hours);
        }
        Ok(outcome)
    }
}

/// Forces `Failure` when the child has been `Running` for longer than `duration_hours`.
///
/// Only the status seen by the parent changes; side effects the child already applied to the
/// world stay in place. The running streak restarts after any non-`Running` result.
pub struct Timeout<W>
where
    W: WorldMut + 'static,
{
    name: String,
    duration_hours: f64,
    child: BoxedNode<W>,
}

impl<W> Timeout<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<String>, duration_hours: f64, child: BoxedNode<W>) -> Self {
        Self {
            name: name.into(),
            duration_hours,
            child,
        }
    }
}

impl<W> BtNode<W> for Timeout<W>
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Timeout
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
        let key = keys::timeout_start(&self.name);
        let outcome = self.child.tick(ctx, agent, world, blackboard)?;

        if outcome.status != BtStatus::Running {
            blackboard.delete(&key);
            return Ok(outcome);
        }

        match blackboard.number(&key)? {
            None => {
                blackboard.set(key, ctx.now_hours);
                Ok(outcome)
            }
            Some(started) if ctx.elapsed_since(started) > self.duration_hours => {
                tracing::trace!(
                    node = %self.name,
                    tick = ctx.tick,
                    started,
                    "running child timed out"
                );
                self.reset(blackboard);
                Ok(NodeOutcome::failure().with_note(format!("{} timed out", self.name)))
            }
            Some(_) => Ok(outcome),
        }
    }

    fn reset(&self, blackboard: &mut Blackboard) {
        blackboard.delete(&keys::timeout_start(&self.name));
        self.child.reset(blackboard);
    }
}

/// Swaps `Success` and `Failure`; `Running` passes through.
pub struct Inverter<W>
where
    W: WorldMut + 'static,
{
    name: String,
    child: BoxedNode<W>,
}

impl<W> Inverter<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<String>, child: BoxedNode<W>) -> Self {
        Self {
            name: name.into(),
            child,
        }
    }
}

impl<W> BtNode<W> for Inverter<W>
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Inverter
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
        let mut outcome = self.child.tick(ctx, agent, world, blackboard)?;
        outcome.status = match outcome.status {
            BtStatus::Success => BtStatus::Failure,
            BtStatus::Failure | BtStatus::NotEvaluated => BtStatus::Success,
            BtStatus::Running => BtStatus::Running,
        };
        Ok(outcome)
    }
}

/// Reports `Success` once the child finishes, whatever its result. `Running` passes through.
pub struct ForceSuccess<W>
where
    W: WorldMut + 'static,
{
    name: String,
    child: BoxedNode<W>,
}

impl<W> ForceSuccess<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<String>, child: BoxedNode<W>) -> Self {
        Self {
            name: name.into(),
            child,
        }
    }
}

impl<W> BtNode<W> for ForceSuccess<W>
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::ForceSuccess
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
        let mut outcome = self.child.tick(ctx, agent, world, blackboard)?;
        if outcome.status != BtStatus::Running {
            outcome.status = BtStatus::Success;
        }
        Ok(outcome)
    }
}
