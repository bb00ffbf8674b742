//! # Font Management
//!
//! Reports are drawn with the standard PDF fonts (Helvetica, Courier),
//! which need no embedding. This module maps a family/weight/style triple
//! to one of them and measures text with its width table.

pub mod metrics;

pub use metrics::{to_winansi, StandardFontMetrics};
use std::collections::HashMap;

use crate::style::FontSpec;

/// A font registry that maps font family + weight + style to a standard font.
pub struct FontRegistry {
    fonts: HashMap<FontKey, StandardFont>,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
}

impl FontKey {
    /// Key for a font spec, with the weight snapped to 400 or 700.
    pub fn for_spec(font: &FontSpec) -> Self {
        Self {
            family: font.family.clone(),
            weight: snap_weight(font.weight),
            italic: font.is_italic(),
        }
    }
}

fn snap_weight(weight: u32) -> u32 {
    if weight >= 600 {
        700
    } else {
        400
    }
}

/// The standard PDF fonts a report can draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => StandardFontMetrics::HELVETICA,
            Self::HelveticaBold | Self::HelveticaBoldOblique => StandardFontMetrics::HELVETICA_BOLD,
            Self::Courier | Self::CourierBold | Self::CourierOblique | Self::CourierBoldOblique => {
                StandardFontMetrics::COURIER
            }
        }
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let mut fonts = HashMap::new();

        let standard_mappings = [
            (("Helvetica", 400, false), StandardFont::Helvetica),
            (("Helvetica", 700, false), StandardFont::HelveticaBold),
            (("Helvetica", 400, true), StandardFont::HelveticaOblique),
            (("Helvetica", 700, true), StandardFont::HelveticaBoldOblique),
            (("Courier", 400, false), StandardFont::Courier),
            (("Courier", 700, false), StandardFont::CourierBold),
            (("Courier", 400, true), StandardFont::CourierOblique),
            (("Courier", 700, true), StandardFont::CourierBoldOblique),
        ];

        for ((family, weight, italic), font) in standard_mappings {
            fonts.insert(
                FontKey {
                    family: family.to_string(),
                    weight,
                    italic,
                },
                font,
            );
        }

        Self { fonts }
    }

    /// Look up a font, falling back to Helvetica if the family is unknown.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> StandardFont {
        let key = FontKey {
            family: family.to_string(),
            weight: snap_weight(weight),
            italic,
        };
        if let Some(font) = self.fonts.get(&key) {
            return *font;
        }

        log::warn!("Font not found: {family} weight={weight} italic={italic}, using Helvetica");
        match (snap_weight(weight) == 700, italic) {
            (false, false) => StandardFont::Helvetica,
            (true, false) => StandardFont::HelveticaBold,
            (false, true) => StandardFont::HelveticaOblique,
            (true, true) => StandardFont::HelveticaBoldOblique,
        }
    }
}

/// Shared font context used by measurement and PDF serialization.
#[derive(Default)]
pub struct FontContext {
    registry: FontRegistry,
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, font: &FontSpec) -> f64 {
        self.resolve(font).metrics().char_width(ch, font.size)
    }

    /// Measure the width of a string in points.
    pub fn measure_string(&self, text: &str, font: &FontSpec) -> f64 {
        self.resolve(font).metrics().measure_string(text, font.size, 0.0)
    }

    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    pub fn resolve(&self, font: &FontSpec) -> StandardFont {
        self.registry
            .resolve(&font.family, font.weight, font.is_italic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helvetica(weight: u32) -> FontSpec {
        FontSpec::new("Helvetica", 12.0, weight)
    }

    #[test]
    fn test_font_context_helvetica() {
        let ctx = FontContext::new();
        let w = ctx.char_width(' ', &helvetica(400));
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_font_context_bold_wider() {
        let ctx = FontContext::new();
        let regular = ctx.measure_string("Total", &helvetica(400));
        let bold = ctx.measure_string("Total", &helvetica(700));
        assert!(bold > regular, "Bold text should be wider than regular");
    }

    #[test]
    fn test_font_context_fallback() {
        let ctx = FontContext::new();
        let w1 = ctx.char_width('A', &helvetica(400));
        let w2 = ctx.char_width('A', &FontSpec::new("UnknownFont", 12.0, 400));
        assert!((w1 - w2).abs() < 0.001);
    }

    #[test]
    fn test_font_context_weight_resolution() {
        let ctx = FontContext::new();
        assert_eq!(ctx.resolve(&helvetica(800)), StandardFont::HelveticaBold);
        assert_eq!(ctx.resolve(&helvetica(500)), StandardFont::Helvetica);
    }

    #[test]
    fn courier_is_monospaced() {
        let ctx = FontContext::new();
        let font = FontSpec::new("Courier", 10.0, 400);
        assert_eq!(ctx.measure_string("iiii", &font), ctx.measure_string("MMMM", &font));
    }

    #[test]
    fn winansi_characters_have_their_own_widths() {
        let ctx = FontContext::new();
        let font = FontSpec::new("Helvetica", 1000.0, 400);
        assert_eq!(ctx.char_width('é', &font), 556.0);
        assert_eq!(ctx.char_width('Æ', &font), 1000.0);
        assert_eq!(ctx.char_width('\u{2014}', &font), 1000.0);
        assert_eq!(ctx.char_width('£', &font), 556.0);
    }

    #[test]
    fn unencodable_characters_measure_like_question_mark() {
        let ctx = FontContext::new();
        let font = helvetica(400);
        assert_eq!(ctx.char_width('\u{4e2d}', &font), ctx.char_width('?', &font));
    }

    #[test]
    fn winansi_mapping() {
        assert_eq!(to_winansi('A'), Some(0x41));
        assert_eq!(to_winansi('é'), Some(0xE9));
        assert_eq!(to_winansi('€'), Some(0x80));
        assert_eq!(to_winansi('\u{2019}'), Some(0x92));
        assert_eq!(to_winansi('\u{0101}'), None);
    }
}
