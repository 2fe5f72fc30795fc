//! Error types for the lantern engine

use thiserror::Error;

/// Main error type for lantern operations
///
/// The render pipeline itself has no fatal path: malformed documents are
/// tolerated and rendered best-effort. Errors only surface at the pipeline
/// edges, when input cannot be read or driven through the parser at all.
#[derive(Debug, Error)]
pub enum Error {
    /// The feed markup could not be driven through the parser
    #[error("feed parse error: {0}")]
    Parse(String),
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for lantern operations
pub type Result<T> = std::result::Result<T, Error>;
