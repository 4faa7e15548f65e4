//! Evaluation driver for move trees
//!
//! This crate connects a [`move_tree::MoveTree`] to external evaluators:
//! - [`Evaluator`]: async trait implemented by predictor and search backends
//! - [`AnalysisSession`]: owns the tree, issues requests keyed by node, and
//!   merges results with the cache's upgrade-only rule
//! - [`StopSignal`]: advisory cancellation for streaming searches
//! - [`AnalysisConfig`]: TOML-loadable settings

mod cancel;
mod config;
mod evaluator;
mod session;

pub use cancel::*;
pub use config::*;
pub use evaluator::*;
pub use session::*;
