use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

/// Handle to a node inside a [`crate::MoveTree`].
///
/// Handles are arena indices that are never reused, so one captured before an
/// asynchronous evaluation still names the same node when the result arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("FEN has no side-to-move field")]
    MissingSide,
    #[error("invalid side to move '{0}'")]
    InvalidSide(String),
    #[error("invalid fullmove number '{0}'")]
    InvalidFullmove(String),
}

/// Bookkeeping derived once from a position string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    /// Half-moves played since the start of the game
    pub ply: u32,
    pub side_to_move: Color,
}

impl PositionInfo {
    /// Derive ply and side to move from a FEN string.
    ///
    /// Only the side-to-move and fullmove fields are read; a FEN without a
    /// fullmove field counts as move 1.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut fields = fen.split_whitespace().skip(1);
        let side = match fields.next() {
            Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(other) => return Err(FenError::InvalidSide(other.to_string())),
            None => return Err(FenError::MissingSide),
        };
        // castling, en passant, halfmove clock
        let fullmove = match fields.nth(3) {
            Some(txt) => match txt.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(FenError::InvalidFullmove(txt.to_string())),
            },
            None => 1,
        };
        Ok(Self {
            ply: 2 * (fullmove - 1) + side.idx() as u32,
            side_to_move: side,
        })
    }

    /// The info of the position one half-move later.
    pub fn next(self) -> Self {
        Self {
            ply: self.ply + 1,
            side_to_move: self.side_to_move.other(),
        }
    }

    /// Full-move number as written in move lists (1. e4 e5 2. ...)
    pub fn move_number(self) -> u32 {
        self.ply / 2 + 1
    }
}

/// Annotations a caller can attach to a move. The tree never reads them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFlags {
    pub mistake: bool,
    pub blunder: bool,
    pub brilliant: bool,
    /// Move came from an opening book or drill script
    pub book: bool,
    pub comment: Option<String>,
}

impl MoveFlags {
    pub fn is_empty(&self) -> bool {
        *self == MoveFlags::default()
    }
}
