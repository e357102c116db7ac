use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tribe_bt::build::{condition, selector, sequence};
use tribe_bt::{BehaviorTree, BoxedNode};
use tribe_core::{
    tick_brains, AgentControl, AgentTable, Blackboard, Brain, EntityId, MapSize, Policy,
    TickContext, WorldMut, WorldView,
};

#[derive(Default)]
struct World {
    agents: AgentTable<u64>,
}

impl WorldView for World {
    type Agent = u64;

    fn map_size(&self) -> MapSize {
        MapSize::new(512.0, 512.0)
    }

    fn entity_exists(&self, id: EntityId) -> bool {
        self.agents.contains(id)
    }

    fn agents(&self) -> Vec<u64> {
        self.agents.ids()
    }
}

impl WorldMut for World {
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

fn always_true(_ctx: &TickContext, _agent: u64, _world: &World, _bb: &mut Blackboard) -> bool {
    true
}

fn bench_shared_tree_tick(c: &mut Criterion) {
    let conditions = (0..32)
        .map(|i| condition(format!("cond_{i}"), always_true))
        .collect::<Vec<BoxedNode<World>>>();
    let root = selector("root", vec![sequence("all", conditions)]);
    let tree: Rc<dyn Policy<World>> = Rc::new(BehaviorTree::new("bench", root).unwrap());

    let mut world = World::default();
    let mut brains = (0..256u64)
        .map(|id| {
            world.agents.spawn(id);
            Brain::new(id, Rc::clone(&tree))
        })
        .collect::<Vec<_>>();

    let mut tick: u64 = 0;
    c.bench_function("tribe-bt/tick(agents=256,conditions=32)", |b| {
        b.iter(|| {
            let ctx = TickContext::new(tick, tick as f64 * 0.01);
            let report = tick_brains(&ctx, &mut world, &mut brains);
            black_box(report.agents.len());
            tick = tick.wrapping_add(1);
        })
    });
}

criterion_group!(benches, bench_shared_tree_tick);
criterion_main!(benches);
