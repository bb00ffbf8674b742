//! # Rows
//!
//! A row is the unit the grid paginates: one or more cells side by side,
//! as tall as the tallest of them, never split across pages.

use crate::error::{FolioError, Result};
use crate::font::FontContext;
use crate::layout::cell::{resolve_column_widths, CellLayout, CellRenderer, ColumnWidth};
use crate::layout::RenderTarget;
use crate::style::Alignment;

/// How the row width is divided between its cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellSplit {
    /// Every cell gets the same share. A single cell gets the full width.
    #[default]
    Equal,
    /// Explicit widths per cell, resolved like table columns. Cells
    /// beyond the end of the list are `Auto`.
    Widths(Vec<ColumnWidth>),
}

/// Row-level formatting. Affects horizontal placement only.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFormatting {
    pub alignment: Alignment,
    pub split: CellSplit,
}

impl Default for RowFormatting {
    fn default() -> Self {
        Self {
            alignment: Alignment::Center,
            split: CellSplit::Equal,
        }
    }
}

#[derive(Debug, Clone)]
struct RowMeasurement {
    available_width: f64,
    height: f64,
    /// `(x offset, slot width, layout)` per cell.
    cells: Vec<(f64, f64, CellLayout)>,
}

/// An ordered group of cells sharing one row.
#[derive(Debug, Clone)]
pub struct RowRenderer {
    cells: Vec<CellRenderer>,
    formatting: RowFormatting,
    measured: Option<RowMeasurement>,
}

impl RowRenderer {
    /// A row holding a single cell that spans the full width.
    pub fn new(cell: CellRenderer) -> Self {
        Self::with_cells(vec![cell], CellSplit::Equal)
    }

    pub fn with_cells(cells: Vec<CellRenderer>, split: CellSplit) -> Self {
        Self {
            cells,
            formatting: RowFormatting {
                split,
                ..RowFormatting::default()
            },
            measured: None,
        }
    }

    /// An empty row `height` points tall.
    pub fn spacer(height: f64) -> Self {
        Self::new(CellRenderer::spacer(0.0, height))
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.formatting.alignment = alignment;
        self
    }

    pub fn formatting(&self) -> &RowFormatting {
        &self.formatting
    }

    pub fn cells(&self) -> &[CellRenderer] {
        &self.cells
    }

    /// Measured height, if the row has been measured.
    pub fn height(&self) -> Option<f64> {
        self.measured.as_ref().map(|m| m.height)
    }

    fn slot_widths(&self, available_width: f64) -> Vec<f64> {
        let count = self.cells.len();
        match &self.formatting.split {
            CellSplit::Equal => vec![available_width / count.max(1) as f64; count],
            CellSplit::Widths(defs) => {
                let defs: Vec<ColumnWidth> = (0..count)
                    .map(|i| defs.get(i).copied().unwrap_or_default())
                    .collect();
                resolve_column_widths(&defs, available_width)
            }
        }
    }

    /// Measure the row for `available_width` and return its height.
    ///
    /// The result is kept on the row; measuring again at the same width
    /// returns it unchanged.
    pub fn measure(&mut self, available_width: f64, fonts: &FontContext) -> Result<f64> {
        if let Some(measured) = &self.measured {
            if measured.available_width == available_width {
                return Ok(measured.height);
            }
        }

        let mut cells = Vec::with_capacity(self.cells.len());
        let mut x = 0.0;
        let mut height: f64 = 0.0;
        for (cell, width) in self.cells.iter().zip(self.slot_widths(available_width)) {
            let layout = cell.measure(width, fonts)?;
            height = height.max(layout.height);
            cells.push((x, width, layout));
            x += width;
        }

        self.measured = Some(RowMeasurement {
            available_width,
            height,
            cells,
        });
        Ok(height)
    }

    /// Draw the row with its top-left corner at `(x, y)`.
    ///
    /// The row must have been measured for exactly `available_width`.
    pub fn render(
        &self,
        x: f64,
        y: f64,
        available_width: f64,
        target: &mut dyn RenderTarget,
    ) -> Result<()> {
        let measured = match &self.measured {
            Some(m) if m.available_width == available_width => m,
            Some(m) => {
                return Err(FolioError::LayoutState(format!(
                    "row measured for width {} but rendered at width {}",
                    m.available_width, available_width
                )))
            }
            None => {
                return Err(FolioError::LayoutState(
                    "row rendered before it was measured".to_string(),
                ))
            }
        };

        for (cell, (offset, _, layout)) in self.cells.iter().zip(&measured.cells) {
            cell.draw(
                layout,
                x + offset,
                y,
                measured.height,
                self.formatting.alignment,
                target,
            )?;
        }
        Ok(())
    }
}
