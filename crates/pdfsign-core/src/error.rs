//! Error handling for PdfSign
//!
//! One taxonomy covers every failure a signing session can surface:
//! - Invalid input (wrong file type, empty selection, empty signature)
//! - Load failures (the renderer cannot parse the source document)
//! - Invalid dimensions (zero/negative geometry reaching the coordinate mapper)
//! - Commit failures (the document mutator rejected the final embed)
//!
//! Collaborator-specific errors are converted into these variants at the
//! boundary where they are awaited. All error types use `thiserror`.

use thiserror::Error;

/// Main error type for PdfSign
///
/// This is the error type used by every public session API.
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before entering the core (non-fatal).
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected.
        reason: String,
    },

    /// The renderer could not parse or render the source document.
    #[error("Failed to load document: {reason}")]
    LoadFailure {
        /// The underlying renderer failure.
        reason: String,
    },

    /// Geometry with a non-positive or non-finite extent.
    #[error("Invalid dimensions for {context}: {width}x{height}")]
    InvalidDimensions {
        /// Which value carried the bad geometry.
        context: String,
        /// The offending width.
        width: f64,
        /// The offending height.
        height: f64,
    },

    /// The document mutator rejected the final embed.
    #[error("Commit failed: {reason}")]
    CommitFailed {
        /// The underlying mutator failure.
        reason: String,
    },

    /// The session has not reached the state an operation requires.
    #[error("Not ready: {reason}")]
    NotReady {
        /// What is missing.
        reason: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn load_failure(reason: impl Into<String>) -> Self {
        Error::LoadFailure {
            reason: reason.into(),
        }
    }

    pub fn commit_failed(reason: impl Into<String>) -> Self {
        Error::CommitFailed {
            reason: reason.into(),
        }
    }

    pub fn not_ready(reason: impl Into<String>) -> Self {
        Error::NotReady {
            reason: reason.into(),
        }
    }

    pub fn invalid_dimensions(context: impl Into<String>, width: f64, height: f64) -> Self {
        Error::InvalidDimensions {
            context: context.into(),
            width,
            height,
        }
    }

    /// Check if this is an input validation error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput { .. })
    }

    /// Check if this is a document load error
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Error::LoadFailure { .. })
    }

    /// Check if this is a geometry contract violation
    pub fn is_invalid_dimensions(&self) -> bool {
        matches!(self, Error::InvalidDimensions { .. })
    }

    /// Check if this is a commit error
    pub fn is_commit_failed(&self) -> bool {
        matches!(self, Error::CommitFailed { .. })
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
