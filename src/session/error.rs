//! Error types for the MazeQuest core
//!
//! Domain errors use thiserror; conversions to anyhow happen at control
//! boundaries (the CLI). Editing and execution preconditions are deliberate
//! silent no-ops and never surface here; error values exist only for
//! boundary validation: unknown level ids, unknown instruction-kind names,
//! malformed fixtures.

use thiserror::Error;

/// Top-level session error
#[derive(Debug, Error)]
pub enum SessionError {
    /// Level fixture errors
    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    /// Instruction catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Level fixture errors
#[derive(Debug, Error)]
pub enum LevelError {
    /// No fixture with the requested id
    #[error("Level {0} not found")]
    NotFound(u32),

    /// Fixture data failed to parse
    #[error("Level fixture error: {0}")]
    Fixture(#[from] serde_json::Error),
}

/// Convenience result alias for level operations
pub type LevelResult<T> = std::result::Result<T, LevelError>;

/// Instruction catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Name does not match any catalog entry
    #[error("Unknown instruction kind '{0}'")]
    UnknownKind(String),
}

/// Convenience result alias for catalog operations
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Result type using SessionError
pub type Result<T> = std::result::Result<T, SessionError>;
