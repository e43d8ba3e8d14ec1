//! # PdfSign Document
//!
//! The document-side collaborators of a signing session:
//!
//! - [`Renderer`]: parse a source PDF, report page sizes, rasterize pages
//! - [`DocumentMutator`]: embed the signature image into one page
//! - [`intake`]: refuse non-PDF selections before they reach the renderer
//!
//! Both traits are async (`?Send`) because the session runs on a single
//! thread. lopdf-backed implementations ship with the crate.

pub mod error;
pub mod intake;
pub mod lopdf_renderer;
pub mod mutator;
pub mod page_tree;
pub mod renderer;

pub use error::{MutationError, RenderError};
pub use intake::{suggested_filename, validate_source, PDF_MEDIA_TYPE};
pub use lopdf_renderer::{LopdfRenderer, PdfDocument};
pub use mutator::{DocumentMutator, LopdfMutator};
pub use page_tree::PageBox;
pub use renderer::{PageRaster, RenderedPage, Renderer};
