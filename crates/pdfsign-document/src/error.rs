//! Error types for the document collaborators.
//!
//! Renderer and mutator failures stay specific here; the session converts
//! them into the core taxonomy where they are awaited.

use thiserror::Error;

/// Failures while loading or rendering a document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The bytes are not a readable PDF.
    #[error("Failed to parse PDF: {reason}")]
    Parse { reason: String },

    /// The document parsed but has an empty page tree.
    #[error("Document has no pages")]
    NoPages,

    /// A 0-based page index past the end of the document.
    #[error("Page index {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: u32, count: u32 },

    /// A render scale that is zero, negative, or not finite.
    #[error("Invalid render scale: {scale}")]
    InvalidScale { scale: f64 },

    /// The page raster could not be allocated.
    #[error("Raster error: {reason}")]
    Raster { reason: String },
}

/// Failures while embedding the signature into the document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Failed to parse PDF: {reason}")]
    Parse { reason: String },

    #[error("Page index {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: u32, count: u32 },

    /// The signature bytes are not a decodable image.
    #[error("Invalid signature image: {reason}")]
    InvalidImage { reason: String },

    /// The target rectangle has a non-positive or non-finite extent.
    #[error("Invalid target rectangle: {reason}")]
    InvalidRect { reason: String },

    /// The page tree has an unexpected shape (missing dictionary, bad Contents).
    #[error("Malformed page structure: {reason}")]
    Structure { reason: String },

    /// Serializing the mutated document failed.
    #[error("Failed to write PDF: {reason}")]
    Write { reason: String },
}

impl RenderError {
    pub fn parse(reason: impl Into<String>) -> Self {
        RenderError::Parse {
            reason: reason.into(),
        }
    }
}

impl MutationError {
    pub fn structure(reason: impl Into<String>) -> Self {
        MutationError::Structure {
            reason: reason.into(),
        }
    }

    /// Whether retrying with the same inputs can never succeed.
    pub fn is_permanent(&self) -> bool {
        !matches!(self, MutationError::Write { .. })
    }
}

impl From<RenderError> for pdfsign_core::Error {
    fn from(err: RenderError) -> Self {
        pdfsign_core::Error::load_failure(err.to_string())
    }
}

impl From<MutationError> for pdfsign_core::Error {
    fn from(err: MutationError) -> Self {
        pdfsign_core::Error::commit_failed(err.to_string())
    }
}
