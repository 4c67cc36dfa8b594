//! Typed errors returned at library boundaries (FEN/move parsing, position
//! construction). Top-level binaries and the UCI loop convert these into
//! `anyhow::Error` at the application edge, where free-form context is
//! attached.

/// Errors produced while parsing or constructing chess data structures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A FEN string (or one of its fields) is malformed.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// A UCI move string (e.g. `"e2e4"`, `"e7e8q"`) is malformed.
    #[error("invalid move string: {0}")]
    InvalidMoveString(String),
}
