//! # Style
//!
//! Colors, font specifications and the named styles a report draws with.
//! Reports never pick raw colors or sizes directly; they ask for a
//! [`ColorStyle`] or [`FontRole`] and resolve it here.

/// An RGB color with components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Named colors used by report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorStyle {
    /// Body text.
    Default,
    /// Group titles and table borders.
    Outline,
    /// Header row background.
    HeaderFill,
    /// Footer (totals) row background.
    FooterFill,
}

impl ColorStyle {
    pub fn color(self) -> Color {
        match self {
            ColorStyle::Default => Color::BLACK,
            ColorStyle::Outline => Color::hex("#405080"),
            ColorStyle::HeaderFill => Color::hex("#dfe4f0"),
            ColorStyle::FooterFill => Color::hex("#eeeeee"),
        }
    }
}

/// Upright or slanted glyphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Everything needed to measure and draw a run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub weight: u32,
    pub style: FontStyle,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
}

impl FontSpec {
    pub fn new(family: &str, size: f64, weight: u32) -> Self {
        Self {
            family: family.to_string(),
            size,
            weight,
            style: FontStyle::Normal,
            line_height: 1.4,
        }
    }

    pub fn is_italic(&self) -> bool {
        matches!(self.style, FontStyle::Italic)
    }

    /// Height of one line of text in points.
    pub fn line_advance(&self) -> f64 {
        self.size * self.line_height
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        FontRole::Default.font()
    }
}

/// Named fonts used by report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Title,
    Default,
    TableHeader,
    Table,
    Footer,
}

impl FontRole {
    pub fn font(self) -> FontSpec {
        match self {
            FontRole::Title => FontSpec::new("Helvetica", 18.0, 700),
            FontRole::Default => FontSpec::new("Helvetica", 12.0, 400),
            FontRole::TableHeader => FontSpec::new("Helvetica", 10.0, 700),
            FontRole::Table => FontSpec::new("Helvetica", 9.0, 400),
            FontRole::Footer => {
                let mut font = FontSpec::new("Helvetica", 8.0, 400);
                font.style = FontStyle::Italic;
                font
            }
        }
    }
}

/// Horizontal placement of content inside the width it was given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

impl Alignment {
    /// X offset of content `content_width` wide inside `available` points.
    pub fn offset(self, content_width: f64, available: f64) -> f64 {
        let slack = (available - content_width).max(0.0);
        match self {
            Alignment::Start => 0.0,
            Alignment::Center => slack / 2.0,
            Alignment::End => slack,
        }
    }
}
