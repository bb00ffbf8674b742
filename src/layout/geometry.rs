//! # Page Geometry
//!
//! Page size, margins and the header/footer bands, and the usable content
//! area they leave. Landscape output is produced by swapping width and
//! height for the duration of an [`OrientationGuard`].

use std::ops::{Deref, DerefMut};

use crate::error::{FolioError, Result};
use crate::model::PageSetup;

/// Physical page dimensions and the reserved bands around the content area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_horizontal: f64,
    pub margin_vertical: f64,
    /// Band below the top margin reserved for the page header.
    pub header_reserve: f64,
    /// Band above the bottom margin reserved for the page footer.
    pub footer_reserve: f64,
}

impl PageGeometry {
    pub fn new(
        width: f64,
        height: f64,
        margin_horizontal: f64,
        margin_vertical: f64,
        header_reserve: f64,
        footer_reserve: f64,
    ) -> Result<Self> {
        let geometry = Self {
            width,
            height,
            margin_horizontal,
            margin_vertical,
            header_reserve,
            footer_reserve,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Geometry for a page setup with the given header/footer bands.
    pub fn from_setup(setup: &PageSetup, header_reserve: f64, footer_reserve: f64) -> Result<Self> {
        let (width, height) = setup.size.dimensions();
        Self::new(
            width,
            height,
            setup.margin_horizontal,
            setup.margin_vertical,
            header_reserve,
            footer_reserve,
        )
    }

    pub fn usable_width(&self) -> f64 {
        self.width - 2.0 * self.margin_horizontal
    }

    pub fn usable_height(&self) -> f64 {
        self.height - 2.0 * self.margin_vertical - self.header_reserve - self.footer_reserve
    }

    /// X coordinate of the content area's left edge.
    pub fn content_x(&self) -> f64 {
        self.margin_horizontal
    }

    /// Y coordinate (from the top of the page) of the content area's top edge.
    pub fn content_y(&self) -> f64 {
        self.margin_vertical + self.header_reserve
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    /// Reject geometries that are not finite, negative, or leave no content area.
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("width", self.width),
            ("height", self.height),
            ("horizontal margin", self.margin_horizontal),
            ("vertical margin", self.margin_vertical),
            ("header reserve", self.header_reserve),
            ("footer reserve", self.footer_reserve),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(FolioError::LayoutConfiguration(format!(
                    "page {name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.usable_width() <= 0.0 {
            return Err(FolioError::LayoutConfiguration(format!(
                "no usable width: page is {} wide with {} horizontal margins",
                self.width, self.margin_horizontal
            )));
        }
        if self.usable_height() <= 0.0 {
            return Err(FolioError::LayoutConfiguration(format!(
                "no usable height: page is {} tall with {} vertical margins, {} header and {} footer",
                self.height, self.margin_vertical, self.header_reserve, self.footer_reserve
            )));
        }
        Ok(())
    }

    /// Exchange width and height. Applying it twice restores the original.
    pub fn swap_orientation(&mut self) {
        std::mem::swap(&mut self.width, &mut self.height);
    }

    /// Swap to landscape when `landscape` is set, for as long as the
    /// returned guard lives. The swap is undone when the guard drops.
    pub fn orient(&mut self, landscape: bool) -> Result<OrientationGuard<'_>> {
        if landscape {
            self.swap_orientation();
        }
        let guard = OrientationGuard {
            geometry: self,
            swapped: landscape,
        };
        guard.validate()?;
        Ok(guard)
    }
}

/// Scoped orientation swap. Derefs to the (possibly swapped) geometry.
#[derive(Debug)]
pub struct OrientationGuard<'a> {
    geometry: &'a mut PageGeometry,
    swapped: bool,
}

impl OrientationGuard<'_> {
    pub fn is_swapped(&self) -> bool {
        self.swapped
    }
}

impl Deref for OrientationGuard<'_> {
    type Target = PageGeometry;

    fn deref(&self) -> &PageGeometry {
        self.geometry
    }
}

impl DerefMut for OrientationGuard<'_> {
    fn deref_mut(&mut self) -> &mut PageGeometry {
        self.geometry
    }
}

impl Drop for OrientationGuard<'_> {
    fn drop(&mut self) {
        if self.swapped {
            self.geometry.swap_orientation();
        }
    }
}
