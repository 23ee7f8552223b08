//! Error types for the Duelwing core.
//!
//! Only startup and persistence can fail. Per-frame simulation operations are
//! total over already-validated state and never return a `Result`.

use thiserror::Error;

/// Errors raised by the game core and its platform collaborators.
#[derive(Debug, Error)]
pub enum GameError {
    /// The display surface could not be created or presented.
    #[error("display surface failure: {0}")]
    Surface(String),

    /// An image asset failed to load.
    #[error("failed to load asset `{path}`: {reason}")]
    Asset {
        /// Path the loader was asked for
        path: String,
        /// Loader-specific reason
        reason: String,
    },

    /// Underlying I/O failure (save file, terminal).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The save file did not contain two lines of two integers.
    #[error("malformed save file at line {line}: {reason}")]
    SaveFormat {
        /// 1-based line number of the offending line
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl GameError {
    /// Returns `true` for initialization failures that must abort the session.
    ///
    /// Save/load failures are not fatal: the loop logs and ignores them.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Surface(_) | Self::Asset { .. } | Self::Config(_))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = GameError> = std::result::Result<T, E>;
