//! Move attachment: the only way nodes enter the tree.
//!
//! An incoming move is classified, in order, as
//! 1. navigation to the existing main child playing the same move,
//! 2. navigation to an existing variation playing the same move,
//! 3. a new main-line node, when `at` has no main child and is itself on
//!    the main line (this includes the first move from any root),
//! 4. a new variation otherwise. A node off the main line never grows a
//!    main-line child, even when it has no children yet.

use std::time::Duration;

use tracing::trace;

use crate::node::Node;
use crate::tree::MoveTree;
use crate::types::*;

/// A move already validated and resolved by the rules engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMove {
    pub uci: String,
    /// Position after the move
    pub position: String,
    pub display: Option<String>,
    pub elapsed: Option<Duration>,
}

impl NewMove {
    pub fn new(uci: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            uci: uci.into(),
            position: position.into(),
            display: None,
            elapsed: None,
        }
    }

    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachKind {
    MainLine,
    Variation,
}

/// Outcome of [`MoveTree::attach`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attachment {
    /// The move already existed; nothing was mutated.
    Navigated(NodeId),
    Attached(NodeId, AttachKind),
}

impl Attachment {
    /// The node the caller is now "at"
    pub fn node(self) -> NodeId {
        match self {
            Attachment::Navigated(id) | Attachment::Attached(id, _) => id,
        }
    }

    /// How a new node was filed; None for pure navigation
    pub fn kind(self) -> Option<AttachKind> {
        match self {
            Attachment::Navigated(_) => None,
            Attachment::Attached(_, kind) => Some(kind),
        }
    }

    pub fn is_new(self) -> bool {
        matches!(self, Attachment::Attached(..))
    }
}

impl MoveTree {
    /// Play `mv` from `at`, reusing an existing child when one already plays it.
    pub fn attach(&mut self, at: NodeId, mv: NewMove) -> Attachment {
        let node = &self[at];
        if let Some(main) = node.main_child
            && self[main].uci() == Some(mv.uci.as_str())
        {
            trace!(at = %at, uci = %mv.uci, "navigated to main child");
            return Attachment::Navigated(main);
        }
        if let Some(existing) = self.child_with_move(at, &mv.uci) {
            trace!(at = %at, uci = %mv.uci, "navigated to variation");
            return Attachment::Navigated(existing);
        }

        let kind = if self[at].main_child.is_none() && self.is_on_main_line(at) {
            AttachKind::MainLine
        } else {
            AttachKind::Variation
        };

        let parent_info = PositionInfo {
            ply: self[at].ply(),
            side_to_move: self[at].side_to_move(),
        };
        let info = PositionInfo::from_fen(&mv.position).unwrap_or_else(|e| {
            tracing::warn!(error = %e, uci = %mv.uci, "resulting position is not a valid FEN");
            parent_info.next()
        });
        let child = Node {
            uci: Some(mv.uci),
            display_move: mv.display,
            elapsed: mv.elapsed,
            info,
            ..Node::root(mv.position, info)
        };
        let id = self.push_child(at, child, kind == AttachKind::MainLine);
        trace!(at = %at, node = %id, ?kind, "attached");
        Attachment::Attached(id, kind)
    }

    /// Bulk import: attach each move at the then-current end of the main line.
    ///
    /// Returns the final main-line node.
    pub fn extend_main_line(&mut self, moves: impl IntoIterator<Item = NewMove>) -> NodeId {
        for mv in moves {
            let end = self.main_line_end();
            self.attach(end, mv);
        }
        self.main_line_end()
    }

    /// Attach a sequence of moves starting at `at`, each one played from
    /// wherever the previous attach left off. Returns the last node reached.
    pub fn replay_from(&mut self, at: NodeId, moves: impl IntoIterator<Item = NewMove>) -> NodeId {
        moves
            .into_iter()
            .fold(at, |cur, mv| self.attach(cur, mv).node())
    }
}

#[cfg(test)]
#[path = "attach_tests.rs"]
mod attach_tests;
