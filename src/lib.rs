//! # PdfSign
//!
//! Draw a signature, place it on a page of a PDF, and embed it into a new
//! PDF, entirely locally.
//!
//! ## Architecture
//!
//! PdfSign is organized as a workspace with multiple crates:
//!
//! 1. **pdfsign-core** - Geometry types, error taxonomy, constants
//! 2. **pdfsign-designer** - Coordinate mapper, capture pad, placement state machine, navigation
//! 3. **pdfsign-document** - Renderer and document mutator traits with lopdf implementations
//! 4. **pdfsign-settings** - Configuration files
//! 5. **pdfsign** - The signing session, commit pipeline, and the CLI binary
//!
//! ## Flow
//!
//! ```text
//! load_document ─▶ render page 1 ─▶ set_signature ─▶ overlay at 1/3 height
//!        pointer_down / pointer_move / pointer_up ─▶ overlay (canvas px)
//!        go_to_page ─▶ re-render, overlay kept as-is
//! finish ─▶ to_document_space ─▶ mutator.embed_image (once) ─▶ CommittedDocument
//! ```

pub mod commit;
pub mod output;
pub mod session;
pub mod strokes;

pub use commit::CommittedDocument;
pub use output::{FileSink, OutputSink, ShareOutcome};
pub use session::{RenderRequest, SessionOptions, SigningSession};
pub use strokes::StrokeScript;

pub use pdfsign_core::{
    DocumentRect, Dimensions, Error, OverlayState, PageContext, PageViewport, Position, Result,
};
pub use pdfsign_designer::{
    CaptureSurface, HitRegion, InteractionMode, PageNavigator, PlacementController,
    PointerListenerHost, SignatureAsset, TrackedListeners,
};
pub use pdfsign_document::{
    DocumentMutator, LopdfMutator, LopdfRenderer, MutationError, RenderError, RenderedPage,
    Renderer,
};
pub use pdfsign_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("PDFSIGN_BUILD_DATE");

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty console output on stderr (stdout is left for command output)
/// - RUST_LOG environment variable support, INFO otherwise
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Initialize logging as one JSON object per line on stderr.
pub fn init_logging_json() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .json();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
