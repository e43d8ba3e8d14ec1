//! The result of committing a signing session.

use pdfsign_core::DocumentRect;

/// A signed document ready to hand to the host's save/share surface.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedDocument {
    bytes: Vec<u8>,
    filename: String,
    page_index: u32,
    rect: DocumentRect,
}

impl CommittedDocument {
    pub fn new(bytes: Vec<u8>, filename: String, page_index: u32, rect: DocumentRect) -> Self {
        Self {
            bytes,
            filename,
            page_index,
            rect,
        }
    }

    /// The complete output PDF.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Suggested filename, `signed_<original>` by default.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// 0-based index of the signed page.
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    /// Where the signature was drawn, in PDF points.
    pub fn rect(&self) -> &DocumentRect {
        &self.rect
    }
}
