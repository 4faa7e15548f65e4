//! Move feeds from live streams and importers.
//!
//! A live game feed delivers the full move list on every update. Replaying it
//! from the root through [`MoveTree::attach`] navigates over the moves the
//! tree already has and only attaches the new suffix.

use move_tree::{MoveTree, NewMove, NodeId};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed move feed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A move already resolved by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMove {
    pub uci: String,
    /// Position after the move
    pub fen: String,
    #[serde(default)]
    pub san: Option<String>,
    /// Time spent on the move
    #[serde(default)]
    pub clock_ms: Option<u64>,
}

impl From<&ResolvedMove> for NewMove {
    fn from(mv: &ResolvedMove) -> Self {
        NewMove {
            uci: mv.uci.clone(),
            position: mv.fen.clone(),
            display: mv.san.clone(),
            elapsed: mv.clock_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Moves that already existed in the tree
    pub navigated: usize,
    pub attached: usize,
    /// Node reached after the last move
    pub tip: NodeId,
}

/// Replay `moves` from the root of `tree`.
pub fn sync_main_line(tree: &mut MoveTree, moves: &[ResolvedMove]) -> SyncReport {
    let mut report = SyncReport {
        navigated: 0,
        attached: 0,
        tip: tree.root(),
    };
    for mv in moves {
        let result = tree.attach(report.tip, mv.into());
        if result.is_new() {
            report.attached += 1;
        } else {
            report.navigated += 1;
        }
        report.tip = result.node();
    }
    debug!(navigated = report.navigated, attached = report.attached, "move feed synced");
    report
}

/// Parse a JSON array of resolved moves
pub fn parse_feed(json: &str) -> Result<Vec<ResolvedMove>, FeedError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod feed_tests;
