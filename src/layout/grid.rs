//! # Grid Renderer
//!
//! Owns the rows of a report and paginates them. The grid moves through
//! three states: rows are added while it is empty, [`GridRenderer::measure`]
//! assigns every row a placement and fixes the page count, and
//! [`GridRenderer::render`] replays those placements onto a target exactly
//! once.

use crate::error::{FolioError, Result};
use crate::font::FontContext;
use crate::layout::page_break::{decide_break, BreakDecision};
use crate::layout::{PageDecorations, PageGeometry, RenderTarget, RowRenderer};

/// Where a measured row goes: page index and offset from the top of the
/// content area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page: usize,
    pub y: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
enum GridState {
    Empty,
    Measured {
        placements: Vec<Placement>,
        page_count: usize,
    },
    Rendered {
        placements: Vec<Placement>,
        page_count: usize,
    },
}

/// Tracks the current page while rows are placed.
struct PageCursor {
    page: usize,
    y: f64,
    remaining: f64,
    empty: bool,
    page_height: f64,
}

impl PageCursor {
    fn new(page_height: f64) -> Self {
        Self {
            page: 0,
            y: 0.0,
            remaining: page_height,
            empty: true,
            page_height,
        }
    }

    fn next_page(&mut self) {
        self.page += 1;
        self.y = 0.0;
        self.remaining = self.page_height;
        self.empty = true;
    }

    fn place(&mut self, height: f64) -> Placement {
        let placement = Placement {
            page: self.page,
            y: self.y,
            height,
        };
        self.y += height;
        self.remaining = (self.remaining - height).max(0.0);
        self.empty = false;
        placement
    }
}

/// A paginated sequence of rows.
#[derive(Debug, Clone)]
pub struct GridRenderer {
    geometry: PageGeometry,
    rows: Vec<RowRenderer>,
    decorations: PageDecorations,
    state: GridState,
}

impl GridRenderer {
    /// Create an empty grid. The geometry is copied, so later changes to
    /// the caller's geometry do not affect this grid.
    pub fn new(geometry: &PageGeometry) -> Result<Self> {
        geometry.validate()?;
        Ok(Self {
            geometry: *geometry,
            rows: Vec::new(),
            decorations: PageDecorations::default(),
            state: GridState::Empty,
        })
    }

    /// Draw `decorations` on every page. The header and footer bands are
    /// widened to fit them if the geometry reserves less.
    pub fn with_decorations(mut self, decorations: PageDecorations) -> Result<Self> {
        let mut geometry = self.geometry;
        geometry.header_reserve = geometry.header_reserve.max(decorations.header_reserve());
        geometry.footer_reserve = geometry.footer_reserve.max(decorations.footer_reserve());
        geometry.validate()?;
        self.geometry = geometry;
        self.decorations = decorations;
        self.state = GridState::Empty;
        Ok(self)
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn rows(&self) -> &[RowRenderer] {
        &self.rows
    }

    /// Append a row. Adding to a measured grid discards the measurement.
    pub fn add_row(&mut self, row: RowRenderer) -> Result<()> {
        self.add_rows(std::iter::once(row))
    }

    pub fn add_rows(&mut self, rows: impl IntoIterator<Item = RowRenderer>) -> Result<()> {
        match self.state {
            GridState::Rendered { .. } => {
                return Err(FolioError::LayoutState(
                    "cannot add rows to a grid that has already been rendered".to_string(),
                ))
            }
            GridState::Measured { .. } => {
                log::debug!("Rows added after measuring; measurement discarded");
                self.state = GridState::Empty;
            }
            GridState::Empty => {}
        }
        self.rows.extend(rows);
        Ok(())
    }

    /// Measure every row and assign it a page and offset. Returns the
    /// number of pages. An empty grid still produces one page.
    pub fn measure(&mut self, fonts: &FontContext) -> Result<usize> {
        if let GridState::Rendered { .. } = self.state {
            return Err(FolioError::LayoutState(
                "cannot measure a grid that has already been rendered".to_string(),
            ));
        }

        let width = self.geometry.usable_width();
        let page_height = self.geometry.usable_height();
        let mut cursor = PageCursor::new(page_height);
        let mut placements = Vec::with_capacity(self.rows.len());

        for (index, row) in self.rows.iter_mut().enumerate() {
            let height = row.measure(width, fonts)?;
            match decide_break(cursor.remaining, page_height, height, cursor.empty) {
                BreakDecision::Place => {}
                BreakDecision::MoveToNextPage => {
                    cursor.next_page();
                    log::debug!("Row {index} ({height:.1}pt) starts page {}", cursor.page + 1);
                }
                BreakDecision::Overflow { fresh_page } => {
                    if fresh_page {
                        cursor.next_page();
                    }
                    log::warn!(
                        "Row {index} is {height:.1}pt tall but a page only holds {page_height:.1}pt; it will overflow page {}",
                        cursor.page + 1
                    );
                }
            }
            placements.push(cursor.place(height));
        }

        let page_count = cursor.page + 1;
        log::info!("Laid out {} rows on {page_count} page(s)", self.rows.len());
        self.state = GridState::Measured {
            placements,
            page_count,
        };
        Ok(page_count)
    }

    /// Draw every page onto `target`. The grid must be measured first and
    /// can only be rendered once. Returns the number of pages drawn.
    pub fn render(&mut self, target: &mut dyn RenderTarget, fonts: &FontContext) -> Result<usize> {
        let (placements, page_count) = match std::mem::replace(&mut self.state, GridState::Empty) {
            GridState::Measured {
                placements,
                page_count,
            } => (placements, page_count),
            other => {
                let message = match other {
                    GridState::Rendered { .. } => "grid has already been rendered",
                    _ => "grid rendered before it was measured",
                };
                self.state = other;
                return Err(FolioError::LayoutState(message.to_string()));
            }
        };

        let geometry = self.geometry;
        let x = geometry.content_x();
        let top = geometry.content_y();
        let width = geometry.usable_width();

        for page in 0..page_count {
            target.new_page(geometry.width, geometry.height)?;
            self.decorations
                .draw(page, page_count, &geometry, fonts, target)?;
            for (row, placement) in self.rows.iter().zip(&placements) {
                if placement.page == page {
                    row.render(x, top + placement.y, width, target)?;
                }
            }
        }

        self.state = GridState::Rendered {
            placements,
            page_count,
        };
        Ok(page_count)
    }

    /// Placements of all rows, in row order, once measured.
    pub fn placements(&self) -> Option<&[Placement]> {
        match &self.state {
            GridState::Empty => None,
            GridState::Measured { placements, .. } | GridState::Rendered { placements, .. } => {
                Some(placements)
            }
        }
    }

    pub fn page_count(&self) -> Option<usize> {
        match &self.state {
            GridState::Empty => None,
            GridState::Measured { page_count, .. } | GridState::Rendered { page_count, .. } => {
                Some(*page_count)
            }
        }
    }

    /// Indices of the rows placed on `page`.
    pub fn rows_on_page(&self, page: usize) -> Vec<usize> {
        self.placements()
            .map(|placements| {
                placements
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.page == page)
                    .map(|(i, _)| i)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self.state, GridState::Rendered { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PdfDocument;
    use crate::style::{Color, FontSpec};

    fn geometry() -> PageGeometry {
        PageGeometry::new(600.0, 800.0, 20.0, 20.0, 0.0, 0.0).unwrap()
    }

    fn grid_of(heights: &[f64]) -> GridRenderer {
        let mut grid = GridRenderer::new(&geometry()).unwrap();
        grid.add_rows(heights.iter().map(|h| RowRenderer::spacer(*h)))
            .unwrap();
        grid
    }

    #[test]
    fn five_rows_of_200_take_two_pages() {
        let fonts = FontContext::new();
        let mut grid = grid_of(&[200.0; 5]);
        assert_eq!(grid.measure(&fonts).unwrap(), 2);

        let placements = grid.placements().unwrap();
        let pages: Vec<usize> = placements.iter().map(|p| p.page).collect();
        let ys: Vec<f64> = placements.iter().map(|p| p.y).collect();
        assert_eq!(pages, vec![0, 0, 0, 1, 1]);
        assert_eq!(ys, vec![0.0, 200.0, 400.0, 0.0, 200.0]);
        assert_eq!(grid.rows_on_page(1), vec![3, 4]);
    }

    #[test]
    fn placements_never_exceed_the_page_and_keep_order() {
        let fonts = FontContext::new();
        let heights = [120.0, 300.0, 45.5, 760.0, 10.0, 333.3, 400.0, 12.0];
        let mut grid = grid_of(&heights);
        grid.measure(&fonts).unwrap();
        let placements = grid.placements().unwrap();

        let mut last = (0, 0.0);
        for (placement, height) in placements.iter().zip(heights) {
            assert!(placement.y + height <= 760.0 + 1e-9);
            assert!((placement.page, placement.y) >= last);
            last = (placement.page, placement.y);
        }
    }

    #[test]
    fn empty_grid_has_one_page() {
        let fonts = FontContext::new();
        let mut grid = grid_of(&[]);
        assert_eq!(grid.measure(&fonts).unwrap(), 1);

        let mut target = PdfDocument::new();
        assert_eq!(grid.render(&mut target, &fonts).unwrap(), 1);
        assert_eq!(target.pages().len(), 1);
    }

    #[test]
    fn oversized_row_gets_its_own_page() {
        let fonts = FontContext::new();
        let mut grid = grid_of(&[100.0, 900.0, 50.0]);
        assert_eq!(grid.measure(&fonts).unwrap(), 3);
        let pages: Vec<usize> = grid.placements().unwrap().iter().map(|p| p.page).collect();
        assert_eq!(pages, vec![0, 1, 2]);
    }

    #[test]
    fn oversized_first_row_stays_on_first_page() {
        let fonts = FontContext::new();
        let mut grid = grid_of(&[900.0]);
        assert_eq!(grid.measure(&fonts).unwrap(), 1);
    }

    #[test]
    fn measuring_twice_gives_the_same_result() {
        let fonts = FontContext::new();
        let mut grid = grid_of(&[250.0, 250.0, 250.0, 250.0]);
        let first = grid.measure(&fonts).unwrap();
        let first_placements = grid.placements().unwrap().to_vec();
        assert_eq!(grid.measure(&fonts).unwrap(), first);
        assert_eq!(grid.placements().unwrap(), first_placements.as_slice());
    }

    #[test]
    fn render_before_measure_is_an_error() {
        let fonts = FontContext::new();
        let mut grid = grid_of(&[10.0]);
        let mut target = PdfDocument::new();
        let err = grid.render(&mut target, &fonts).unwrap_err();
        assert!(matches!(err, FolioError::LayoutState(_)));
        assert!(target.pages().is_empty());
    }

    #[test]
    fn second_render_is_an_error() {
        let fonts = FontContext::new();
        let mut grid = grid_of(&[10.0]);
        grid.measure(&fonts).unwrap();
        let mut target = PdfDocument::new();
        grid.render(&mut target, &fonts).unwrap();
        assert!(grid.is_rendered());
        assert!(grid.render(&mut target, &fonts).is_err());
        assert!(grid.add_row(RowRenderer::spacer(5.0)).is_err());
        assert_eq!(target.pages().len(), 1);
    }

    #[test]
    fn adding_rows_discards_measurement() {
        let fonts = FontContext::new();
        let mut grid = grid_of(&[10.0]);
        grid.measure(&fonts).unwrap();
        grid.add_row(RowRenderer::spacer(5.0)).unwrap();
        assert!(grid.placements().is_none());
        assert_eq!(grid.measure(&fonts).unwrap(), 1);
        assert_eq!(grid.placements().unwrap().len(), 2);
    }

    #[test]
    fn rows_are_drawn_at_content_offsets() {
        let fonts = FontContext::new();
        let font = FontSpec::new("Helvetica", 10.0, 400);
        let mut grid = GridRenderer::new(&geometry()).unwrap();
        // 750 + 14 exceeds the 760pt usable height, so the text row breaks
        grid.add_row(RowRenderer::spacer(750.0)).unwrap();
        grid.add_row(
            RowRenderer::new(crate::layout::CellRenderer::text("next", Color::BLACK, font))
                .aligned(crate::style::Alignment::Start),
        )
        .unwrap();
        grid.measure(&fonts).unwrap();

        let mut target = PdfDocument::new();
        assert_eq!(grid.render(&mut target, &fonts).unwrap(), 2);
        assert!(target.pages()[0].texts().is_empty());
        let texts = target.pages()[1].texts();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].x, 20.0);
        assert!(texts[0].baseline > 20.0 && texts[0].baseline < 40.0);
    }

    #[test]
    fn decorations_number_every_page() {
        let fonts = FontContext::new();
        let mut grid = GridRenderer::new(&geometry())
            .unwrap()
            .with_decorations(PageDecorations {
                page_numbers: true,
                ..Default::default()
            })
            .unwrap();
        grid.add_rows((0..3).map(|_| RowRenderer::spacer(500.0)))
            .unwrap();
        assert!(grid.geometry().footer_reserve > 0.0);
        assert_eq!(grid.measure(&fonts).unwrap(), 3);

        let mut target = PdfDocument::new();
        grid.render(&mut target, &fonts).unwrap();
        let labels: Vec<String> = target
            .pages()
            .iter()
            .flat_map(|p| p.texts().into_iter().map(|t| t.text.clone()))
            .collect();
        assert_eq!(labels, vec!["Page 1 of 3", "Page 2 of 3", "Page 3 of 3"]);
    }
}
