//! # Page Decorations
//!
//! Text repeated on every page in the bands reserved above and below the
//! content area: a running header, a footer line and "Page X of Y".
//! Drawn during the render pass, when the page count is already known.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::font::FontContext;
use crate::layout::{PageGeometry, RenderTarget};
use crate::style::{ColorStyle, FontRole, FontSpec};

/// Gap between a decoration band and the content area.
const BAND_GAP: f64 = 6.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageDecorations {
    pub header: Option<String>,
    pub footer: Option<String>,
    pub page_numbers: bool,
}

impl PageDecorations {
    fn font() -> FontSpec {
        FontRole::Footer.font()
    }

    /// Height to reserve above the content area.
    pub fn header_reserve(&self) -> f64 {
        if self.header.is_some() {
            Self::font().line_advance() + BAND_GAP
        } else {
            0.0
        }
    }

    /// Height to reserve below the content area.
    pub fn footer_reserve(&self) -> f64 {
        if self.footer.is_some() || self.page_numbers {
            Self::font().line_advance() + BAND_GAP
        } else {
            0.0
        }
    }

    /// Draw the decorations of page `page_index` (0-based) of `page_count`.
    pub fn draw(
        &self,
        page_index: usize,
        page_count: usize,
        geometry: &PageGeometry,
        fonts: &FontContext,
        target: &mut dyn RenderTarget,
    ) -> Result<()> {
        let font = Self::font();
        let color = ColorStyle::Default.color();
        let left = geometry.content_x();
        let right = geometry.width - geometry.margin_horizontal;

        if let Some(header) = &self.header {
            let baseline = geometry.margin_vertical + font.size;
            target.draw_text(left, baseline, header, &font, color)?;
        }

        let footer_baseline = geometry.height - geometry.margin_vertical - font.line_advance() + font.size;
        if let Some(footer) = &self.footer {
            target.draw_text(left, footer_baseline, footer, &font, color)?;
        }
        if self.page_numbers {
            let label = format!("Page {} of {}", page_index + 1, page_count);
            let width = fonts.measure_string(&label, &font);
            target.draw_text(right - width, footer_baseline, &label, &font, color)?;
        }
        Ok(())
    }
}
