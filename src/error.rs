//! Error types for `logshift`.
//!
//! Uses [`thiserror`] for ergonomic error derivation.

use thiserror::Error;

/// Errors that can occur in `logshift`.
///
/// Maps to exit codes: [`Config`](Self::Config) and [`Toml`](Self::Toml) → exit 1,
/// [`Io`](Self::Io) → exit 2.
#[derive(Debug, Error)]
pub enum LogShiftError {
    /// Configuration error (bad flag combination, unreadable config file).
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization error.
    #[error("config file error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Stamp-shaped text whose components do not form a calendar date/time.
    ///
    /// Only ever produced inside the matcher, which drops the candidate.
    #[error("malformed timestamp: {0}")]
    MalformedTimestamp(String),
}

impl LogShiftError {
    /// Process exit code for this error.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Toml(_) => 1,
            Self::Io(_) | Self::MalformedTimestamp(_) => 2,
        }
    }
}
