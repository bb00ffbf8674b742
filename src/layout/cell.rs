//! # Cells
//!
//! The content of a row. A cell measures itself for a given width and
//! later draws itself from that measurement, so what is drawn is exactly
//! what was measured.

use crate::error::{FolioError, Result};
use crate::font::FontContext;
use crate::layout::{Rect, RenderTarget, Stroke};
use crate::model::Edges;
use crate::style::{Alignment, Color, FontSpec};
use crate::text::{BrokenLine, TextLayout};

/// Distance from the top of a line box to the baseline, as a fraction of
/// the font size.
const ASCENT: f64 = 0.8;

/// How wide a column (or a cell in a split row) is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ColumnWidth {
    /// Share the width left over by fixed and fractional columns equally.
    #[default]
    Auto,
    /// Exactly this many points.
    Fixed(f64),
    /// This fraction of the available width.
    Fraction(f64),
}

/// Resolve column widths to points. Fixed and fractional columns take
/// their share first; auto columns split whatever is left.
pub fn resolve_column_widths(defs: &[ColumnWidth], available_width: f64) -> Vec<f64> {
    let mut widths = Vec::with_capacity(defs.len());
    let mut remaining = available_width;
    let mut auto_count = 0;

    for def in defs {
        match def {
            ColumnWidth::Fixed(w) => {
                widths.push(*w);
                remaining -= w;
            }
            ColumnWidth::Fraction(f) => {
                let w = available_width * f;
                widths.push(w);
                remaining -= w;
            }
            ColumnWidth::Auto => {
                widths.push(0.0);
                auto_count += 1;
            }
        }
    }

    if auto_count > 0 {
        let auto_width = remaining.max(0.0) / auto_count as f64;
        for (i, def) in defs.iter().enumerate() {
            if matches!(def, ColumnWidth::Auto) {
                widths[i] = auto_width;
            }
        }
    }

    widths
}

/// A run of wrapped text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCell {
    pub text: String,
    pub color: Color,
    pub font: FontSpec,
    pub padding: Edges,
}

impl TextCell {
    pub fn new(text: impl Into<String>, color: Color, font: FontSpec) -> Self {
        Self {
            text: text.into(),
            color,
            font,
            padding: Edges::default(),
        }
    }

    pub fn with_padding(mut self, padding: Edges) -> Self {
        self.padding = padding;
        self
    }
}

/// Fixed-size empty space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacerCell {
    pub width: f64,
    pub height: f64,
}

/// A horizontal group of cells laid out in columns, like one table row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCellGroup {
    pub cells: Vec<CellRenderer>,
    /// Width of each column. Cells beyond the end of this list are `Auto`.
    pub widths: Vec<ColumnWidth>,
    /// Outline drawn around every cell of the group.
    pub border: Option<Stroke>,
    pub background: Option<Color>,
}

/// Anything that can occupy a slot in a row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellRenderer {
    Text(TextCell),
    Spacer(SpacerCell),
    Group(TableCellGroup),
}

/// The measured footprint of a cell, plus what is needed to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct CellLayout {
    pub width: f64,
    pub height: f64,
    pub content: CellContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text {
        lines: Vec<BrokenLine>,
        /// Width the lines were broken for (available width minus padding).
        inner_width: f64,
    },
    Empty,
    Group {
        /// `(x offset, column width, nested layout)` for each nested cell.
        columns: Vec<(f64, f64, CellLayout)>,
    },
}

impl CellRenderer {
    pub fn text(text: impl Into<String>, color: Color, font: FontSpec) -> Self {
        CellRenderer::Text(TextCell::new(text, color, font))
    }

    pub fn spacer(width: f64, height: f64) -> Self {
        CellRenderer::Spacer(SpacerCell { width, height })
    }

    /// Measure this cell for `available_width` points.
    ///
    /// A pure function of the cell, the width and the font metrics.
    pub fn measure(&self, available_width: f64, fonts: &FontContext) -> Result<CellLayout> {
        match self {
            CellRenderer::Text(cell) => {
                let inner_width = (available_width - cell.padding.horizontal()).max(0.0);
                let lines =
                    TextLayout::new().break_into_lines(fonts, &cell.text, inner_width, &cell.font);
                let widest = lines.iter().map(|l| l.width).fold(0.0, f64::max);
                let height = lines.len() as f64 * cell.font.line_advance() + cell.padding.vertical();
                Ok(CellLayout {
                    width: (widest + cell.padding.horizontal()).min(available_width),
                    height,
                    content: CellContent::Text { lines, inner_width },
                })
            }
            CellRenderer::Spacer(spacer) => Ok(CellLayout {
                width: spacer.width.min(available_width),
                height: spacer.height,
                content: CellContent::Empty,
            }),
            CellRenderer::Group(group) => {
                let defs: Vec<ColumnWidth> = (0..group.cells.len())
                    .map(|i| group.widths.get(i).copied().unwrap_or_default())
                    .collect();
                let widths = resolve_column_widths(&defs, available_width);

                let mut columns = Vec::with_capacity(group.cells.len());
                let mut x = 0.0;
                let mut height: f64 = 0.0;
                for (cell, width) in group.cells.iter().zip(widths) {
                    let layout = cell.measure(width, fonts)?;
                    height = height.max(layout.height);
                    columns.push((x, width, layout));
                    x += width;
                }

                Ok(CellLayout {
                    width: available_width,
                    height,
                    content: CellContent::Group { columns },
                })
            }
        }
    }

    /// Draw this cell with its top-left corner at `(x, y)`.
    ///
    /// `layout` must be the result of measuring this same cell; `height` is
    /// the height of the row the cell sits in.
    pub fn draw(
        &self,
        layout: &CellLayout,
        x: f64,
        y: f64,
        height: f64,
        alignment: Alignment,
        target: &mut dyn RenderTarget,
    ) -> Result<()> {
        match (self, &layout.content) {
            (CellRenderer::Text(cell), CellContent::Text { lines, inner_width }) => {
                let advance = cell.font.line_advance();
                let leading = advance - cell.font.size;
                for (i, line) in lines.iter().enumerate() {
                    if line.text.is_empty() {
                        continue;
                    }
                    let line_x = x + cell.padding.left + alignment.offset(line.width, *inner_width);
                    let baseline = y
                        + cell.padding.top
                        + i as f64 * advance
                        + leading / 2.0
                        + cell.font.size * ASCENT;
                    target.draw_text(line_x, baseline, &line.text, &cell.font, cell.color)?;
                }
                Ok(())
            }
            (CellRenderer::Spacer(_), CellContent::Empty) => Ok(()),
            (CellRenderer::Group(group), CellContent::Group { columns }) => {
                if let Some(background) = group.background {
                    target.draw_rect(
                        Rect {
                            x,
                            y,
                            width: layout.width,
                            height,
                        },
                        Some(background),
                        None,
                    )?;
                }
                for (cell, (offset, width, nested)) in group.cells.iter().zip(columns) {
                    if let Some(stroke) = group.border {
                        target.draw_rect(
                            Rect {
                                x: x + offset,
                                y,
                                width: *width,
                                height,
                            },
                            None,
                            Some(stroke),
                        )?;
                    }
                    cell.draw(nested, x + offset, y, height, alignment, target)?;
                }
                Ok(())
            }
            _ => Err(FolioError::LayoutState(
                "cell drawn with a layout measured for a different cell kind".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PdfDocument;

    fn font() -> FontSpec {
        FontSpec::new("Helvetica", 10.0, 400)
    }

    #[test]
    fn column_widths_fixed_fraction_then_auto() {
        let widths = resolve_column_widths(
            &[
                ColumnWidth::Fixed(100.0),
                ColumnWidth::Fraction(0.25),
                ColumnWidth::Auto,
                ColumnWidth::Auto,
            ],
            400.0,
        );
        assert_eq!(widths, vec![100.0, 100.0, 100.0, 100.0]);
    }

    #[test]
    fn auto_columns_never_go_negative() {
        let widths = resolve_column_widths(&[ColumnWidth::Fixed(500.0), ColumnWidth::Auto], 400.0);
        assert_eq!(widths[1], 0.0);
    }

    #[test]
    fn text_height_is_lines_times_line_advance() {
        let fonts = FontContext::new();
        let cell = CellRenderer::Text(
            TextCell::new("one two three four five six", Color::BLACK, font())
                .with_padding(Edges::uniform(2.0)),
        );
        let wide = cell.measure(500.0, &fonts).unwrap();
        assert!((wide.height - (14.0 + 4.0)).abs() < 1e-9);

        let narrow = cell.measure(40.0, &fonts).unwrap();
        match &narrow.content {
            CellContent::Text { lines, .. } => {
                assert!(lines.len() > 1);
                assert!((narrow.height - (lines.len() as f64 * 14.0 + 4.0)).abs() < 1e-9);
            }
            other => panic!("expected text layout, got {other:?}"),
        }
        assert!(narrow.width <= 40.0);
    }

    #[test]
    fn measurement_is_deterministic() {
        let fonts = FontContext::new();
        let cell = CellRenderer::text("Conference registration fee", Color::BLACK, font());
        assert_eq!(cell.measure(80.0, &fonts).unwrap(), cell.measure(80.0, &fonts).unwrap());
    }

    #[test]
    fn spacer_keeps_its_height() {
        let fonts = FontContext::new();
        let layout = CellRenderer::spacer(0.0, 40.0).measure(300.0, &fonts).unwrap();
        assert_eq!(layout.height, 40.0);
        assert_eq!(layout.width, 0.0);
    }

    #[test]
    fn group_height_is_tallest_column() {
        let fonts = FontContext::new();
        let group = CellRenderer::Group(TableCellGroup {
            cells: vec![
                CellRenderer::text("short", Color::BLACK, font()),
                CellRenderer::text("a much longer value that wraps", Color::BLACK, font()),
            ],
            widths: vec![ColumnWidth::Fixed(200.0)],
            border: None,
            background: None,
        });
        let layout = group.measure(260.0, &fonts).unwrap();
        match &layout.content {
            CellContent::Group { columns } => {
                assert_eq!(columns.len(), 2);
                assert_eq!(columns[1].0, 200.0);
                assert_eq!(columns[1].1, 60.0);
                assert_eq!(layout.height, columns[1].2.height);
                assert!(columns[1].2.height > columns[0].2.height);
            }
            other => panic!("expected group layout, got {other:?}"),
        }
    }

    #[test]
    fn drawing_with_a_foreign_layout_fails() {
        let fonts = FontContext::new();
        let spacer_layout = CellRenderer::spacer(0.0, 10.0).measure(100.0, &fonts).unwrap();
        let text = CellRenderer::text("x", Color::BLACK, font());
        let mut target = PdfDocument::new();
        target.new_page(200.0, 200.0).unwrap();
        let err = text
            .draw(&spacer_layout, 0.0, 0.0, 10.0, Alignment::Start, &mut target)
            .unwrap_err();
        assert!(matches!(err, FolioError::LayoutState(_)));
    }

    #[test]
    fn end_aligned_text_hugs_the_right_edge() {
        let fonts = FontContext::new();
        let cell = CellRenderer::text("$5.00", Color::BLACK, font());
        let layout = cell.measure(100.0, &fonts).unwrap();
        let mut target = PdfDocument::new();
        target.new_page(200.0, 200.0).unwrap();
        cell.draw(&layout, 10.0, 10.0, layout.height, Alignment::End, &mut target)
            .unwrap();

        let ops = target.pages()[0].texts();
        let width = fonts.measure_string("$5.00", &font());
        assert_eq!(ops.len(), 1);
        assert!((ops[0].x - (110.0 - width)).abs() < 1e-9);
    }
}
