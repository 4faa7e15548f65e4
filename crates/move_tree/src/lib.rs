//! Branching chess move tree.
//!
//! A [`MoveTree`] holds every position reachable from a starting position,
//! the move that produced each one, and any number of alternative
//! continuations. Following `main_child` links from the root gives the main
//! line; every other child is a variation.
//!
//! Moves enter the tree only through [`MoveTree::attach`] (or the bulk import
//! helpers built on it). Positions and moves are opaque strings resolved by
//! an external rules engine; the tree never checks legality.
//!
//! Each node also carries an [`EvaluationCache`] that asynchronous evaluators
//! fill in later, addressed by [`NodeId`].

pub mod attach;
pub mod evaluation;
pub mod node;
pub mod serialize;
pub mod tree;
pub mod types;

pub use attach::*;
pub use evaluation::*;
pub use node::Node;
pub use tree::MoveTree;
pub use types::*;

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
