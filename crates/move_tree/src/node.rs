use std::time::Duration;

use crate::evaluation::EvaluationCache;
use crate::types::*;

/// One position in the tree plus the move that led to it.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) position: String,
    /// Coordinate move that produced this position (None only for the root)
    pub(crate) uci: Option<String>,
    pub(crate) display_move: Option<String>,
    pub(crate) parent: Option<NodeId>,
    /// Creation order, append-only
    pub(crate) children: Vec<NodeId>,
    pub(crate) main_child: Option<NodeId>,
    pub(crate) info: PositionInfo,
    pub(crate) elapsed: Option<Duration>,
    pub(crate) evaluations: EvaluationCache,
    pub(crate) flags: MoveFlags,
    /// Set on every node discarded by a truncate
    pub(crate) detached: bool,
}

impl Node {
    pub(crate) fn root(position: String, info: PositionInfo) -> Self {
        Self {
            position,
            uci: None,
            display_move: None,
            parent: None,
            children: Vec::new(),
            main_child: None,
            info,
            elapsed: None,
            evaluations: EvaluationCache::new(),
            flags: MoveFlags::default(),
            detached: false,
        }
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn uci(&self) -> Option<&str> {
        self.uci.as_deref()
    }

    pub fn display_move(&self) -> Option<&str> {
        self.display_move.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn main_child(&self) -> Option<NodeId> {
        self.main_child
    }

    pub fn ply(&self) -> u32 {
        self.info.ply
    }

    pub fn side_to_move(&self) -> Color {
        self.info.side_to_move
    }

    pub fn move_number(&self) -> u32 {
        self.info.move_number()
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    pub fn evaluations(&self) -> &EvaluationCache {
        &self.evaluations
    }

    pub fn flags(&self) -> &MoveFlags {
        &self.flags
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
