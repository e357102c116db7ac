//! Shorthand constructors for declaring trees.
//!
//! ```ignore
//! let root = selector("root", vec![
//!     sequence("eat", vec![
//!         condition("is_hungry", is_hungry),
//!         action("eat_food", eat_food),
//!     ]),
//!     cooldown("idle_cooldown", 0.5, action("wander", wander)),
//! ]);
//! let tree = BehaviorTree::new("human", root)?;
//! ```

use tribe_core::{Blackboard, TickContext, WorldMut};

use crate::composite::{ReactiveSequence, Selector, Sequence};
use crate::decorator::{Caching, Cooldown, ForceSuccess, Inverter, Timeout};
use crate::gate::{ControlFlags, Gate};
use crate::leaf::{Action, Condition};
use crate::node::{BoxedNode, IntoCheck, IntoNodeResult};

pub fn action<W, F, R>(name: impl Into<String>, run: F) -> BoxedNode<W>
where
    W: WorldMut + 'static,
    F: Fn(&TickContext, W::Agent, &mut W, &mut Blackboard) -> R + 'static,
    R: IntoNodeResult + 'static,
{
    Box::new(Action::new(name, run))
}

pub fn condition<W, F, R>(name: impl Into<String>, check: F) -> BoxedNode<W>
where
    W: WorldMut + 'static,
    F: Fn(&TickContext, W::Agent, &W, &mut Blackboard) -> R + 'static,
    R: IntoCheck + 'static,
{
    Box::new(Condition::new(name, check))
}

pub fn sequence<W>(name: impl Into<String>, children: Vec<BoxedNode<W>>) -> BoxedNode<W>
where
    W: WorldMut + 'static,
{
    Box::new(Sequence::new(name, children))
}

pub fn reactive_sequence<W>(name: impl Into<String>, children: Vec<BoxedNode<W>>) -> BoxedNode<W>
where
    W: WorldMut + 'static,
{
    Box::new(ReactiveSequence::new(name, children))
}

pub fn selector<W>(name: impl Into<String>, children: Vec<BoxedNode<W>>) -> BoxedNode<W>
where
    W: WorldMut + 'static,
{
    Box::new(Selector::new(name, children))
}

pub fn cached<W>(name: impl Into<String>, duration_hours: f64, child: BoxedNode<W>) -> BoxedNode<W>
where
    W: WorldMut + 'static,
{
    Box::new(Caching::new(name, duration_hours, child))
}

pub fn cooldown<W>(
    name: impl Into<String>,
    duration_hours: f64,
    child: BoxedNode<W>,
) -> BoxedNode<W>
where
    W: WorldMut + 'static,
{
    Box::new(Cooldown::new(name, duration_hours, child))
}

pub fn timeout<W>(name: impl Into<String>, duration_hours: f64, child: BoxedNode<W>) -> BoxedNode<W>
where
    W: WorldMut + 'static,
{
    Box::new(Timeout::new(name, duration_hours, child))
}

pub fn inverter<W>(name: impl Into<String>, child: BoxedNode<W>) -> BoxedNode<W>
where
    W: WorldMut + 'static,
{
    Box::new(Inverter::new(name, child))
}

pub fn force_success<W>(name: impl Into<String>, child: BoxedNode<W>) -> BoxedNode<W>
where
    W: WorldMut + 'static,
{
    Box::new(ForceSuccess::new(name, child))
}

pub fn gate<W>(
    name: impl Into<String>,
    allow: impl Fn(&TickContext, W::Agent, &W) -> bool + 'static,
    child: BoxedNode<W>,
) -> BoxedNode<W>
where
    W: WorldMut + 'static,
{
    Box::new(Gate::new(name, allow, child))
}

pub fn manual_control<W>(name: impl Into<String>, child: BoxedNode<W>) -> BoxedNode<W>
where
    W: WorldMut + ControlFlags + 'static,
{
    Box::new(Gate::manual_control(name, child))
}

pub fn autopilot_controlled<W>(
    name: impl Into<String>,
    behavior: &'static str,
    child: BoxedNode<W>,
) -> BoxedNode<W>
where
    W: WorldMut + ControlFlags + 'static,
{
    Box::new(Gate::autopilot_controlled(name, behavior, child))
}

pub fn non_player_controlled<W>(name: impl Into<String>, child: BoxedNode<W>) -> BoxedNode<W>
where
    W: WorldMut + ControlFlags + 'static,
{
    Box::new(Gate::non_player_controlled(name, child))
}
