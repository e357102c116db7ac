use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::rc::Rc;

use tribe_core::{Blackboard, TickContext, WorldMut};

use crate::node::{BoxedNode, BtNode, NodeResult};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node name `{0}` is used more than once; per-agent state would collide")]
    DuplicateName(String),

    #[error("composite `{0}` has no children")]
    EmptyComposite(String),

    #[error("no behavior tree registered for archetype `{0}`")]
    UnknownArchetype(String),
}

/// A validated, shareable behavior tree.
///
/// One instance serves every agent of an archetype. The tree itself never changes after
/// construction; all per-agent state lives on the agent's blackboard.
pub struct BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    name: String,
    root: BoxedNode<W>,
    node_count: usize,
    depth: usize,
}

impl<W> BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    /// Validate `root` (unique node names, no empty composites) and wrap it.
    pub fn new(name: impl Into<String>, root: BoxedNode<W>) -> Result<Self, TreeError> {
        let name = name.into();
        let mut seen = BTreeSet::new();
        let mut node_count = 0;
        let mut depth = 0;
        let mut problem = None;

        walk(&*root, 0, &mut |node, d| {
            node_count += 1;
            depth = depth.max(d);
            if problem.is_some() {
                return;
            }
            if !seen.insert(node.name().to_string()) {
                problem = Some(TreeError::DuplicateName(node.name().to_string()));
            } else if node.kind().is_composite() && node.children().is_empty() {
                problem = Some(TreeError::EmptyComposite(node.name().to_string()));
            }
        });

        if let Some(err) = problem {
            return Err(err);
        }

        tracing::debug!(tree = %name, nodes = node_count, depth, "behavior tree built");
        Ok(Self {
            name,
            root,
            node_count,
            depth,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &dyn BtNode<W> {
        &*self.root
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Depth of the deepest node; the root is at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Visit every node depth-first, with its depth.
    pub fn visit(&self, mut f: impl FnMut(&dyn BtNode<W>, usize)) {
        walk(&*self.root, 0, &mut f);
    }

    /// Indented outline, one node per line: `kind name`.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.visit(|node, depth| {
            let _ = writeln!(
                out,
                "{:indent$}{} {}",
                "",
                node.kind().as_str(),
                node.name(),
                indent = depth * 2
            );
        });
        out
    }

    pub fn tick(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> NodeResult {
        self.root.tick(ctx, agent, world, blackboard)
    }

    /// Clear every in-flight marker this tree keeps on `blackboard`.
    pub fn reset(&self, blackboard: &mut Blackboard) {
        self.root.reset(blackboard);
    }
}

fn walk<W>(node: &dyn BtNode<W>, depth: usize, f: &mut dyn FnMut(&dyn BtNode<W>, usize))
where
    W: WorldMut + 'static,
{
    f(node, depth);
    for child in node.children() {
        walk(child, depth + 1, f);
    }
}

/// Shared trees keyed by agent archetype (e.g. `"human"`, `"predator"`).
pub struct TreeRegistry<W>
where
    W: WorldMut + 'static,
{
    trees: BTreeMap<String, Rc<BehaviorTree<W>>>,
}

impl<W> Default for TreeRegistry<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self {
            trees: BTreeMap::new(),
        }
    }
}

impl<W> TreeRegistry<W>
where
    W: WorldMut + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the tree for `archetype` and return the shared handle.
    pub fn register(
        &mut self,
        archetype: impl Into<String>,
        tree: BehaviorTree<W>,
    ) -> Rc<BehaviorTree<W>> {
        let tree = Rc::new(tree);
        self.trees.insert(archetype.into(), Rc::clone(&tree));
        tree
    }

    pub fn get(&self, archetype: &str) -> Option<Rc<BehaviorTree<W>>> {
        self.trees.get(archetype).cloned()
    }

    pub fn require(&self, archetype: &str) -> Result<Rc<BehaviorTree<W>>, TreeError> {
        self.get(archetype)
            .ok_or_else(|| TreeError::UnknownArchetype(archetype.to_string()))
    }

    pub fn archetypes(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }
}
