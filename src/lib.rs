//! MazeQuest Core – a block-programming maze puzzle engine
//!
//! This crate implements the logic core of a visual block-programming
//! puzzle:
//! - A closed instruction catalog (move up/down/left/right, wait) that is
//!   the sole constructor of script instructions
//! - A linear undo/redo history over the script being edited, kept as
//!   full-list snapshots with branch-discard commit semantics
//! - A sequential execution engine that steps a sprite through its script
//!   against maze geometry with paced holds and decides won/lost
//! - A session state container with a read model and a per-step event
//!   stream for rendering/audio collaborators
//!
//! Rendering, audio playback, and chrome UI live outside this crate; they
//! consume [`session::StateView`] and [`session::StepEvent`].

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Session core modules implementing the puzzle engine
pub mod session;

// Re-export key types for convenience
pub use session::{Session, SessionConfig};

/// Current version of the MazeQuest core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
