//! Recorded game payload

use chrono::{DateTime, Utc};
use move_tree::MoveTree;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Draw,
    Unfinished,
}

impl Outcome {
    /// PGN result tag
    pub fn as_pgn(self) -> &'static str {
        match self {
            Outcome::WhiteWins => "1-0",
            Outcome::BlackWins => "0-1",
            Outcome::Draw => "1/2-1/2",
            Outcome::Unfinished => "*",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub rating: Option<u16>,
}

impl PlayerInfo {
    pub fn new(name: &str, rating: Option<u16>) -> Self {
        Self {
            name: name.to_string(),
            rating,
        }
    }
}

/// Side metadata supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMeta {
    pub outcome: Outcome,
    pub white: PlayerInfo,
    pub black: PlayerInfo,
}

/// A finished (or abandoned) game as sent to the recording service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    /// FEN the game started from
    pub starting_position: String,
    /// Main-line moves in coordinate form
    pub moves: Vec<String>,
    /// Elapsed time per move in milliseconds, aligned with `moves`
    pub move_times_ms: Vec<Option<u64>>,
    pub outcome: Outcome,
    pub white: PlayerInfo,
    pub black: PlayerInfo,
}

impl GameRecord {
    /// Snapshot the main line of `tree`. Variations are not recorded.
    pub fn from_tree(tree: &MoveTree, meta: GameMeta) -> Self {
        let moves = tree.to_move_list();
        let move_times_ms = tree
            .to_time_list()
            .into_iter()
            .map(|t| t.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)))
            .collect();
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            starting_position: tree[tree.root()].position().to_string(),
            moves,
            move_times_ms,
            outcome: meta.outcome,
            white: meta.white,
            black: meta.black,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of half-moves recorded
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod record_tests;
