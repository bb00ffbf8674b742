//! # Page-Aware Grid Layout
//!
//! Reports are a flat sequence of rows. Each row is atomic: it is placed
//! whole on one page, never sliced. Layout runs in two strictly ordered
//! passes:
//!
//! 1. **Measure.** Every row is measured against the usable page width and
//!    assigned a `(page, y)` placement by walking a cursor down the page.
//!    When a row does not fit in the space left, the cursor moves to the
//!    top of the next page. The page count is known before anything is
//!    drawn.
//! 2. **Render.** Pages are opened on the [`RenderTarget`] one by one and
//!    every row is drawn at its recorded placement. Rendering only replays
//!    the measurement; it never measures or decides anything itself.
//!
//! ```text
//!   RowRenderer ──┐
//!   RowRenderer ──┼─► GridRenderer::measure ─► placements ─► GridRenderer::render ─► RenderTarget
//!   RowRenderer ──┘
//! ```

pub mod cell;
pub mod decorations;
pub mod geometry;
pub mod grid;
pub mod page_break;
pub mod row;

pub use cell::{CellRenderer, ColumnWidth, SpacerCell, TableCellGroup, TextCell};
pub use decorations::PageDecorations;
pub use geometry::{OrientationGuard, PageGeometry};
pub use grid::{GridRenderer, Placement};
pub use row::{CellSplit, RowFormatting, RowRenderer};

use crate::error::Result;
use crate::style::{Color, FontSpec};

/// An axis-aligned rectangle in page coordinates (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Outline settings for [`RenderTarget::draw_rect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// A drawing surface pages are rendered onto.
///
/// Coordinates are in points from the top-left corner of the current page.
/// Text is positioned by its baseline.
pub trait RenderTarget {
    /// Finish the current page (if any) and start a new one.
    fn new_page(&mut self, width: f64, height: f64) -> Result<()>;

    fn draw_text(&mut self, x: f64, baseline: f64, text: &str, font: &FontSpec, color: Color)
        -> Result<()>;

    fn draw_rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<Stroke>) -> Result<()>;

    /// Dimensions of the current page, if one has been started.
    fn page_size(&self) -> Option<(f64, f64)>;
}
