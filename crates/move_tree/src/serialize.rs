//! Read-only projections of the main line for external consumers.

use std::time::Duration;

use crate::tree::MoveTree;
use crate::types::NodeId;

impl MoveTree {
    /// Coordinate moves of the main line, from the root's first child on.
    pub fn to_move_list(&self) -> Vec<String> {
        self.main_line_moves(|n| n.uci().map(str::to_string))
    }

    /// Elapsed time of each main-line move, index-aligned with
    /// [`MoveTree::to_move_list`].
    pub fn to_time_list(&self) -> Vec<Option<Duration>> {
        self.main_line()
            .into_iter()
            .skip(1)
            .map(|id| self[id].elapsed())
            .collect()
    }

    /// Display form (usually SAN) of each main-line move. Moves attached
    /// without a display form fall back to their coordinate form.
    pub fn to_display_list(&self) -> Vec<String> {
        self.main_line_moves(|n| n.display_move().or(n.uci()).map(str::to_string))
    }

    /// Main-line nodes with `from_ply <= ply < to_ply`.
    pub fn main_line_slice(&self, from_ply: u32, to_ply: u32) -> Vec<NodeId> {
        self.main_line()
            .into_iter()
            .filter(|&id| (from_ply..to_ply).contains(&self[id].ply()))
            .collect()
    }

    /// Coordinate moves leading from the root to `id`.
    pub fn moves_to(&self, id: NodeId) -> Vec<String> {
        self.path_to(id)
            .into_iter()
            .filter_map(|n| self[n].uci().map(str::to_string))
            .collect()
    }

    fn main_line_moves(&self, f: impl Fn(&crate::Node) -> Option<String>) -> Vec<String> {
        self.main_line()
            .into_iter()
            .skip(1)
            .filter_map(|id| f(&self[id]))
            .collect()
    }
}
