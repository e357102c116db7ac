use tribe_core::{
    Blackboard, BlackboardError, BtStatus, NodeOutcome, TickContext, TickError, WorldMut,
};

pub type NodeResult = Result<NodeOutcome, TickError>;

pub type BoxedNode<W> = Box<dyn BtNode<W>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Action,
    Condition,
    Sequence,
    ReactiveSequence,
    Selector,
    Caching,
    Cooldown,
    Timeout,
    Gate,
    Inverter,
    ForceSuccess,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Action => "action",
            NodeKind::Condition => "condition",
            NodeKind::Sequence => "sequence",
            NodeKind::ReactiveSequence => "reactive_sequence",
            NodeKind::Selector => "selector",
            NodeKind::Caching => "caching",
            NodeKind::Cooldown => "cooldown",
            NodeKind::Timeout => "timeout",
            NodeKind::Gate => "gate",
            NodeKind::Inverter => "inverter",
            NodeKind::ForceSuccess => "force_success",
        }
    }

    pub fn is_composite(self) -> bool {
        matches!(
            self,
            NodeKind::Sequence | NodeKind::ReactiveSequence | NodeKind::Selector
        )
    }
}

/// A behavior-tree node.
///
/// Nodes are immutable and shared by every agent running the same tree. Anything that must
/// persist between ticks for one agent is stored on that agent's blackboard under keys derived
/// from [`BtNode::name`], which is why names must be unique within a tree.
pub trait BtNode<W>: 'static
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str;

    fn kind(&self) -> NodeKind;

    fn children(&self) -> Vec<&dyn BtNode<W>> {
        Vec::new()
    }

    fn tick(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> NodeResult;

    /// Forget this subtree's in-flight markers for one agent (running indices, timers).
    ///
    /// Memoized results and cooldowns are kept.
    fn reset(&self, blackboard: &mut Blackboard) {
        for child in self.children() {
            child.reset(blackboard);
        }
    }
}

/// Blackboard key helpers for per-agent node state.
pub mod keys {
    pub fn last_status(name: &str) -> String {
        format!("{name}_lastStatus")
    }

    pub fn running_child_index(name: &str) -> String {
        format!("{name}_runningChildIndex")
    }

    pub fn caching_status(name: &str) -> String {
        format!("caching_{name}_status")
    }

    pub fn caching_note(name: &str) -> String {
        format!("caching_{name}_note")
    }

    pub fn caching_time(name: &str) -> String {
        format!("caching_{name}_time")
    }

    pub fn cooldown(name: &str) -> String {
        format!("cooldown_{name}")
    }

    pub fn timeout_start(name: &str) -> String {
        format!("timeout_{name}_startTime")
    }
}

/// Last status a composite reported for this agent; `NotEvaluated` before its first tick.
pub fn last_status(blackboard: &Blackboard, name: &str) -> Result<BtStatus, BlackboardError> {
    Ok(blackboard
        .get_as::<BtStatus>(&keys::last_status(name))?
        .unwrap_or_default())
}

pub(crate) fn record_status(blackboard: &mut Blackboard, name: &str, status: BtStatus) {
    blackboard.set(keys::last_status(name), status);
}

/// Conversion for action return values.
pub trait IntoNodeResult {
    fn into_node_result(self) -> NodeResult;
}

impl IntoNodeResult for NodeOutcome {
    fn into_node_result(self) -> NodeResult {
        Ok(self)
    }
}

impl IntoNodeResult for BtStatus {
    fn into_node_result(self) -> NodeResult {
        Ok(NodeOutcome::new(self))
    }
}

impl IntoNodeResult for (BtStatus, &str) {
    fn into_node_result(self) -> NodeResult {
        Ok(self.into())
    }
}

impl IntoNodeResult for (BtStatus, String) {
    fn into_node_result(self) -> NodeResult {
        Ok(self.into())
    }
}

impl<T: IntoNodeResult> IntoNodeResult for Result<T, TickError> {
    fn into_node_result(self) -> NodeResult {
        self.and_then(IntoNodeResult::into_node_result)
    }
}

/// Conversion for condition return values.
pub trait IntoCheck {
    fn into_check(self) -> Result<(bool, Option<String>), TickError>;
}

impl IntoCheck for bool {
    fn into_check(self) -> Result<(bool, Option<String>), TickError> {
        Ok((self, None))
    }
}

impl IntoCheck for (bool, &str) {
    fn into_check(self) -> Result<(bool, Option<String>), TickError> {
        Ok((self.0, Some(self.1.to_string())))
    }
}

impl IntoCheck for (bool, String) {
    fn into_check(self) -> Result<(bool, Option<String>), TickError> {
        Ok((self.0, Some(self.1)))
    }
}

impl<T: IntoCheck> IntoCheck for Result<T, TickError> {
    fn into_check(self) -> Result<(bool, Option<String>), TickError> {
        self.and_then(IntoCheck::into_check)
    }
}
