//! Source document intake.
//!
//! File pickers and drag-and-drop hand over bytes plus an optional media
//! type. Anything that is clearly not a PDF is refused here, before the
//! renderer sees it.

use std::path::Path;

use pdfsign_core::{Error, Result};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Every PDF starts with this header (possibly after a few junk bytes).
const PDF_HEADER: &[u8] = b"%PDF-";

/// How far into the file the header may start.
const HEADER_SEARCH_WINDOW: usize = 1024;

const DEFAULT_DOCUMENT_NAME: &str = "document.pdf";

/// Checks that `bytes` look like a PDF.
///
/// `media_type` is what the host reported for the selection, if anything;
/// parameters such as `; charset=binary` are ignored.
pub fn validate_source(bytes: &[u8], media_type: Option<&str>) -> Result<()> {
    if bytes.is_empty() {
        return Err(Error::invalid_input("no file selected"));
    }

    if let Some(media_type) = media_type {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        if !essence.eq_ignore_ascii_case(PDF_MEDIA_TYPE) {
            return Err(Error::invalid_input(format!(
                "expected {}, got {}",
                PDF_MEDIA_TYPE, essence
            )));
        }
    }

    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    if !window.windows(PDF_HEADER.len()).any(|w| w == PDF_HEADER) {
        return Err(Error::invalid_input("file does not start with a PDF header"));
    }
    Ok(())
}

/// Output filename for a signed copy of `original`: `<prefix><file name>`.
///
/// Directory components are dropped; an empty name becomes `document.pdf`.
pub fn suggested_filename(original: &str, prefix: &str) -> String {
    let name = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_DOCUMENT_NAME);
    format!("{}{}", prefix, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_pdf() {
        assert!(validate_source(b"%PDF-1.7\n...", Some("application/pdf")).is_ok());
        assert!(validate_source(b"%PDF-1.4", Some("Application/PDF; charset=binary")).is_ok());
        assert!(validate_source(b"%PDF-1.4", None).is_ok());
    }

    #[test]
    fn test_header_after_leading_junk() {
        let mut bytes = vec![0u8; 16];
        bytes.extend_from_slice(b"%PDF-1.5");
        assert!(validate_source(&bytes, None).is_ok());
    }

    #[test]
    fn test_rejects_empty_selection() {
        let err = validate_source(b"", Some("application/pdf")).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_rejects_other_media_types() {
        let err = validate_source(b"%PDF-1.7", Some("image/png")).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("image/png"));
    }

    #[test]
    fn test_rejects_missing_header() {
        assert!(validate_source(b"\x89PNG\r\n", None)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(suggested_filename("contract.pdf", "signed_"), "signed_contract.pdf");
        assert_eq!(
            suggested_filename("/home/me/docs/lease.pdf", "signed_"),
            "signed_lease.pdf"
        );
        assert_eq!(suggested_filename("", "signed_"), "signed_document.pdf");
        assert_eq!(suggested_filename("a.pdf", ""), "a.pdf");
    }
}
