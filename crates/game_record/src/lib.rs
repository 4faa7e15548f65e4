//! Game recording for ML-chess move trees
//!
//! This crate provides:
//! - [`GameRecord`]: the serialized main line plus outcome and player metadata
//! - [`GameRecorder`]: write-only submission to a recording service, with a
//!   JSON file implementation and fire-and-forget helper
//! - [`sync_main_line`]: replaying a live or imported move list into a tree

mod feed;
mod record;
mod recorder;

pub use feed::*;
pub use record::*;
pub use recorder::*;
