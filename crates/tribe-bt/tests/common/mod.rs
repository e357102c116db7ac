#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use tribe_bt::build::{action, condition};
use tribe_bt::{BehaviorTree, BoxedNode, ControlFlags};
use tribe_core::{
    AgentControl, AgentTable, Blackboard, BtStatus, EntityId, MapSize, NodeOutcome, TickContext,
    TickError, WorldMut, WorldView,
};

/// World whose leaves return scripted statuses and log every invocation.
#[derive(Default)]
pub struct ToyWorld {
    pub agents: AgentTable<u64>,
    pub scripts: BTreeMap<String, BtStatus>,
    pub calls: Vec<String>,
    pub players: BTreeSet<u64>,
    pub manual: BTreeSet<u64>,
    pub autopilot: BTreeSet<(u64, String)>,
}

impl ToyWorld {
    pub fn with_agents(ids: &[u64]) -> Self {
        let mut world = Self::default();
        for &id in ids {
            world.agents.spawn(id);
        }
        world
    }

    pub fn script(&mut self, leaf: &str, status: BtStatus) {
        self.scripts.insert(leaf.to_string(), status);
    }

    pub fn take_calls(&mut self) -> Vec<String> {
        std::mem::take(&mut self.calls)
    }

    pub fn bb(&self, agent: u64) -> &Blackboard {
        self.agents.blackboard(agent).expect("agent blackboard")
    }
}

impl WorldView for ToyWorld {
    type Agent = u64;

    fn map_size(&self) -> MapSize {
        MapSize::new(64.0, 64.0)
    }

    fn entity_exists(&self, id: EntityId) -> bool {
        self.agents.contains(id)
    }

    fn agents(&self) -> Vec<u64> {
        self.agents.ids()
    }
}

impl WorldMut for ToyWorld {
    fn control_mut(&mut self, agent: u64) -> Option<&mut AgentControl> {
        self.agents.control_mut(agent)
    }

    fn blackboard_mut(&mut self, agent: u64) -> Option<&mut Blackboard> {
        self.agents.blackboard_mut(agent)
    }

    fn take_blackboard(&mut self, agent: u64) -> Option<Blackboard> {
        self.agents.take_blackboard(agent)
    }

    fn put_blackboard(&mut self, agent: u64, blackboard: Blackboard) {
        self.agents.put_blackboard(agent, blackboard);
    }
}

impl ControlFlags for ToyWorld {
    fn is_manually_controlled(&self, agent: u64) -> bool {
        self.manual.contains(&agent)
    }

    fn is_player_controlled(&self, agent: u64) -> bool {
        self.players.contains(&agent)
    }

    fn autopilot_enabled(&self, agent: u64, behavior: &str) -> bool {
        self.autopilot.contains(&(agent, behavior.to_string()))
    }
}

/// Action leaf returning `world.scripts[name]` (default `Success`) with a `name:status` note.
pub fn scripted(name: &str) -> BoxedNode<ToyWorld> {
    let leaf = name.to_string();
    action(
        name,
        move |_ctx: &TickContext, _agent: u64, world: &mut ToyWorld, _bb: &mut Blackboard| {
            world.calls.push(leaf.clone());
            let status = world.scripts.get(&leaf).copied().unwrap_or(BtStatus::Success);
            (status, format!("{leaf}:{}", status.as_str()))
        },
    )
}

/// Condition leaf passing while `world.scripts[name]` is `Success` (default `Success`).
pub fn check(name: &str) -> BoxedNode<ToyWorld> {
    let leaf = name.to_string();
    condition(
        name,
        move |_ctx: &TickContext, _agent: u64, world: &ToyWorld, _bb: &mut Blackboard| {
            let status = world.scripts.get(&leaf).copied().unwrap_or(BtStatus::Success);
            status == BtStatus::Success
        },
    )
}

/// Action leaf that always fails with an error.
pub fn broken(name: &str) -> BoxedNode<ToyWorld> {
    let leaf = name.to_string();
    action(
        name,
        move |_ctx: &TickContext, _agent: u64, _world: &mut ToyWorld, _bb: &mut Blackboard| {
            Err::<BtStatus, _>(TickError::leaf(leaf.clone(), "boom"))
        },
    )
}

/// Tick `tree` once for `agent`, checking its blackboard out of the world like the driver does.
pub fn run(
    tree: &BehaviorTree<ToyWorld>,
    world: &mut ToyWorld,
    agent: u64,
    now_hours: f64,
) -> Result<NodeOutcome, TickError> {
    let mut bb = world.take_blackboard(agent).expect("agent blackboard");
    let ctx = TickContext::new((now_hours * 100.0) as u64, now_hours);
    let result = tree.tick(&ctx, agent, world, &mut bb);
    world.put_blackboard(agent, bb);
    result
}

pub fn status(
    tree: &BehaviorTree<ToyWorld>,
    world: &mut ToyWorld,
    agent: u64,
    now_hours: f64,
) -> BtStatus {
    run(tree, world, agent, now_hours).expect("tick").status
}
