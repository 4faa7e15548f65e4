//! Arena-backed move tree.
//!
//! Nodes live in a `Vec` and refer to each other through [`NodeId`]s. Nothing
//! is ever removed from the arena: truncating a subtree only unlinks it and
//! marks its nodes detached, so ids held elsewhere never dangle.

use std::ops::Index;

use tracing::{debug, warn};

use crate::evaluation::{Evaluation, EvaluatorKind};
use crate::node::Node;
use crate::types::*;

#[derive(Clone, Debug)]
pub struct MoveTree {
    nodes: Vec<Node>,
}

impl MoveTree {
    /// Create a tree whose root is `starting_position` (a FEN string).
    ///
    /// An unparseable FEN still produces a tree; ply and side fall back to
    /// the standard starting values.
    pub fn new(starting_position: impl Into<String>) -> Self {
        let position = starting_position.into();
        let info = PositionInfo::from_fen(&position).unwrap_or_else(|e| {
            warn!(error = %e, "starting position is not a valid FEN, assuming white at ply 0");
            PositionInfo {
                ply: 0,
                side_to_move: Color::White,
            }
        });
        Self {
            nodes: vec![Node::root(position, info)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes ever created, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// False for ids discarded by [`MoveTree::truncate_future`] or foreign ids.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| !n.detached)
    }

    /// Root followed by every `main_child` link, recomputed on each call.
    pub fn main_line(&self) -> Vec<NodeId> {
        let mut line = vec![self.root()];
        let mut cur = self.root();
        while let Some(next) = self[cur].main_child {
            line.push(next);
            cur = next;
        }
        line
    }

    /// Deepest node reachable through `main_child` links
    pub fn main_line_end(&self) -> NodeId {
        let mut cur = self.root();
        while let Some(next) = self[cur].main_child {
            cur = next;
        }
        cur
    }

    /// A node is on the main line iff it is the root, or its parent is on
    /// the main line and has it as `main_child`.
    pub fn is_on_main_line(&self, id: NodeId) -> bool {
        let Some(mut node) = self.node(id) else {
            return false;
        };
        if node.detached {
            return false;
        }
        let mut cur = id;
        while let Some(parent) = node.parent {
            let parent_node = &self[parent];
            if parent_node.main_child != Some(cur) {
                return false;
            }
            cur = parent;
            node = parent_node;
        }
        true
    }

    /// Children of `id` other than its main child, in creation order.
    pub fn variations_of(&self, id: NodeId) -> Vec<NodeId> {
        let node = &self[id];
        node.children
            .iter()
            .copied()
            .filter(|&c| Some(c) != node.main_child)
            .collect()
    }

    pub fn child_with_move(&self, at: NodeId, uci: &str) -> Option<NodeId> {
        self[at]
            .children
            .iter()
            .copied()
            .find(|&c| self[c].uci.as_deref() == Some(uci))
    }

    /// Nodes from the root down to `id`, both inclusive.
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut cur = id;
        while let Some(parent) = self[cur].parent {
            path.push(parent);
            cur = parent;
        }
        path.reverse();
        path
    }

    /// Drop everything after `id`, leaving it a leaf.
    ///
    /// Discarded nodes stay in the arena marked detached, so evaluation
    /// results still in flight for them can be recorded harmlessly.
    pub fn truncate_future(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.0];
        if node.children.is_empty() {
            return;
        }
        let mut stack = std::mem::take(&mut node.children);
        node.main_child = None;
        let mut discarded = 0usize;
        while let Some(next) = stack.pop() {
            let child = &mut self.nodes[next.0];
            child.detached = true;
            stack.extend(child.children.iter().copied());
            discarded += 1;
        }
        debug!(node = %id, discarded, "truncated future");
        self.check_node(id);
    }

    /// Make `id` the main continuation of its parent.
    ///
    /// Main-line membership is derived, so the old main child and its
    /// subtree become a variation without further bookkeeping. Detached
    /// nodes are left alone.
    pub fn promote(&mut self, id: NodeId) {
        let node = &self[id];
        let Some(parent) = node.parent else {
            return;
        };
        if node.detached || !self[parent].children.contains(&id) {
            debug!(node = %id, "promote of detached node ignored");
            return;
        }
        self.nodes[parent.0].main_child = Some(id);
        self.check_node(parent);
    }

    pub fn flags_mut(&mut self, id: NodeId) -> &mut MoveFlags {
        &mut self.nodes[id.0].flags
    }

    /// Merge an evaluation into a node's cache with the upgrade-only rule.
    ///
    /// Detached nodes accept results like any other. Returns false when the
    /// record was not stored (shallower than the cached one, or unknown id).
    pub fn record_evaluation(&mut self, id: NodeId, kind: EvaluatorKind, evaluation: Evaluation) -> bool {
        let Some(node) = self.nodes.get_mut(id.0) else {
            debug!(node = %id, %kind, "evaluation for unknown node dropped");
            return false;
        };
        let depth = evaluation.depth;
        let stored = node.evaluations.record(kind, evaluation);
        debug!(node = %id, %kind, depth, stored, "evaluation merged");
        stored
    }

    pub fn evaluation(&self, id: NodeId, kind: EvaluatorKind) -> Option<&Evaluation> {
        self.node(id)?.evaluations.get(kind)
    }

    pub fn has_evaluation(&self, id: NodeId, kind: EvaluatorKind) -> bool {
        self.node(id).is_some_and(|n| n.evaluations.has(kind))
    }

    pub(crate) fn push_child(&mut self, parent: NodeId, mut child: Node, main: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        child.parent = Some(parent);
        child.detached = self.nodes[parent.0].detached;
        self.nodes.push(child);
        let parent_node = &mut self.nodes[parent.0];
        parent_node.children.push(id);
        if main {
            debug_assert!(parent_node.main_child.is_none(), "main child already set");
            parent_node.main_child = Some(id);
        }
        self.check_node(parent);
        id
    }

    /// Structural invariants; programming errors if violated.
    fn check_node(&self, id: NodeId) {
        let node = &self[id];
        if let Some(main) = node.main_child {
            debug_assert!(node.children.contains(&main), "main child {main} not a child of {id}");
        }
        debug_assert!(
            node.children.iter().all(|&c| self[c].parent == Some(id)),
            "child of {id} has a different parent"
        );
    }
}

impl Index<NodeId> for MoveTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tree_tests;
