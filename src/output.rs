//! Delivery of a committed document.
//!
//! The session only produces bytes and a filename. Saving or sharing is
//! the host's job; a [`FileSink`] covers the command-line case.

use std::path::{Path, PathBuf};

use pdfsign_core::Result;
use tracing::{info, warn};

use crate::commit::CommittedDocument;

/// What happened to a document handed to an [`OutputSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Written or shared; `location` describes where.
    Delivered { location: String },
    /// The user declined (closed the share sheet, refused to overwrite).
    /// A normal outcome, not an error.
    Cancelled,
}

/// Host-side save/share surface.
pub trait OutputSink {
    fn deliver(&self, document: &CommittedDocument) -> Result<ShareOutcome>;
}

/// Writes the document to a file.
#[derive(Debug, Clone)]
pub struct FileSink {
    target: PathBuf,
    overwrite: bool,
}

impl FileSink {
    /// Writes exactly to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            target: path.into(),
            overwrite: false,
        }
    }

    /// Writes into `dir` under the document's suggested filename.
    pub fn in_directory(dir: &Path, document: &CommittedDocument) -> Self {
        Self::new(dir.join(document.filename()))
    }

    /// Replace an existing file instead of declining.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl OutputSink for FileSink {
    fn deliver(&self, document: &CommittedDocument) -> Result<ShareOutcome> {
        if self.target.exists() && !self.overwrite {
            warn!("{} exists; not overwriting", self.target.display());
            return Ok(ShareOutcome::Cancelled);
        }
        std::fs::write(&self.target, document.bytes())?;
        info!(
            "Wrote {} bytes to {}",
            document.bytes().len(),
            self.target.display()
        );
        Ok(ShareOutcome::Delivered {
            location: self.target.display().to_string(),
        })
    }
}
