//! Page navigation and render scale.
//!
//! Tracks the 1-based current page and decides the scale the next render
//! uses: a fixed base scale, or a width-fit scale once the host reports its
//! container width.

use pdfsign_core::{Dimensions, Error, Result};
use tracing::{debug, warn};

use crate::mapper::fit_scale;

#[derive(Debug, Clone)]
pub struct PageNavigator {
    current: u32,
    page_count: u32,
    base_scale: f64,
    fit_to_width: bool,
    container_width: Option<f64>,
}

impl PageNavigator {
    /// Creates a navigator on page 1 of a `page_count`-page document.
    pub fn new(page_count: u32, base_scale: f64) -> Result<Self> {
        if page_count == 0 {
            return Err(Error::load_failure("document has no pages"));
        }
        if !(base_scale.is_finite() && base_scale > 0.0) {
            return Err(Error::invalid_dimensions("render scale", base_scale, base_scale));
        }
        Ok(Self {
            current: 1,
            page_count,
            base_scale,
            fit_to_width: false,
            container_width: None,
        })
    }

    /// Scale pages to the container width instead of the base scale.
    pub fn with_fit_to_width(mut self, enabled: bool) -> Self {
        self.fit_to_width = enabled;
        self
    }

    /// Current page, 1-based.
    pub fn current_page(&self) -> u32 {
        self.current
    }

    /// Current page, 0-based.
    pub fn page_index(&self) -> u32 {
        self.current - 1
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn can_go_previous(&self) -> bool {
        self.current > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current < self.page_count
    }

    /// Moves to page `n` (1-based).
    ///
    /// Returns true if the page changed and a re-render is needed. Requests
    /// outside `1..=page_count` are refused and leave the page unchanged.
    pub fn go_to_page(&mut self, n: u32) -> bool {
        if n < 1 || n > self.page_count {
            warn!(
                "Page {} out of range 1..={}; staying on page {}",
                n, self.page_count, self.current
            );
            return false;
        }
        if n == self.current {
            return false;
        }
        debug!("Page {} -> {}", self.current, n);
        self.current = n;
        true
    }

    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.go_to_page(self.current + 1)
    }

    pub fn previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.go_to_page(self.current - 1)
    }

    /// Records a new container width. Returns true if the render scale may change.
    pub fn set_container_width(&mut self, width: f64) -> bool {
        if !(width.is_finite() && width > 0.0) {
            warn!("Ignoring container width {}", width);
            return false;
        }
        if self.container_width == Some(width) {
            return false;
        }
        self.container_width = Some(width);
        self.fit_to_width
    }

    /// Scale for rendering a page of `native` size.
    pub fn render_scale(&self, native: &Dimensions) -> Result<f64> {
        match (self.fit_to_width, self.container_width) {
            (true, Some(container)) => fit_scale(container, native.width),
            _ => Ok(self.base_scale),
        }
    }
}
