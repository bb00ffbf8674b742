//! # PDF Output
//!
//! [`PdfDocument`] is the [`RenderTarget`] reports are drawn onto. Drawing
//! calls are recorded per page; [`PdfDocument::finish`] then serializes
//! them as a PDF 1.7 file using the standard Type1 fonts, so nothing needs
//! to be embedded.
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree, fonts, pages, content streams
//! ...
//! xref                <- byte offset of every object
//! trailer             <- root and info references
//! %%EOF
//! ```
//!
//! Layout coordinates have their origin at the top-left of the page with y
//! growing downwards; PDF user space grows upwards from the bottom-left.
//! The flip happens here and nowhere else.

use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::{FolioError, Result};
use crate::font::{to_winansi, FontContext, FontKey};
use crate::layout::{Rect, RenderTarget, Stroke};
use crate::model::Metadata;
use crate::style::{Color, FontSpec};

/// A run of text recorded on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub x: f64,
    pub baseline: f64,
    pub text: String,
    pub font: FontSpec,
    pub color: Color,
}

/// A rectangle recorded on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct RectOp {
    pub rect: Rect,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextOp),
    Rect(RectOp),
}

/// One page and everything drawn on it, in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfPage {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<DrawOp>,
}

impl PdfPage {
    pub fn texts(&self) -> Vec<&TextOp> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(text) => Some(text),
                DrawOp::Rect(_) => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<&RectOp> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect(rect) => Some(rect),
                DrawOp::Text(_) => None,
            })
            .collect()
    }
}

/// Records drawing calls and writes them out as a PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfDocument {
    pages: Vec<PdfPage>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[PdfPage] {
        &self.pages
    }

    fn current_page(&mut self) -> Result<&mut PdfPage> {
        self.pages.last_mut().ok_or_else(|| {
            FolioError::LayoutState("drawing requested before the first page was started".to_string())
        })
    }

    /// Serialize the recorded pages.
    pub fn finish(&self, metadata: &Metadata, fonts: &FontContext) -> Vec<u8> {
        // 0 is the free-list head, 1 the catalog, 2 the page tree.
        let mut objects: Vec<PdfObject> = (0..3).map(|_| PdfObject { data: Vec::new() }).collect();

        let font_objects = register_fonts(&mut objects, &self.pages, fonts);
        let font_resources = font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, id))| format!("/F{i} {id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");

        let mut page_ids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content = content_stream(page, &font_objects);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let mut data: Vec<u8> = Vec::new();
            let _ = write!(
                data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            data.extend_from_slice(&compressed);
            data.extend_from_slice(b"\nendstream");
            let content_id = objects.len();
            objects.push(PdfObject { data });

            let page_id = objects.len();
            let dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {content_id} 0 R /Resources << /Font << {font_resources} >> >> >>",
                page.width, page.height
            );
            objects.push(PdfObject {
                data: dict.into_bytes(),
            });
            page_ids.push(page_id);
        }

        objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();
        let kids = page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");
        objects[2].data =
            format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", page_ids.len()).into_bytes();

        let mut info = String::from("<< ");
        if let Some(title) = &metadata.title {
            let _ = write!(info, "/Title ({}) ", escape_pdf_string(title));
        }
        if let Some(author) = &metadata.author {
            let _ = write!(info, "/Author ({}) ", escape_pdf_string(author));
        }
        if let Some(subject) = &metadata.subject {
            let _ = write!(info, "/Subject ({}) ", escape_pdf_string(subject));
        }
        info.push_str("/Producer (Folio) >>");
        let info_id = objects.len();
        objects.push(PdfObject {
            data: info.into_bytes(),
        });

        serialize(&objects, info_id)
    }
}

impl RenderTarget for PdfDocument {
    fn new_page(&mut self, width: f64, height: f64) -> Result<()> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(FolioError::LayoutConfiguration(format!(
                "invalid page size {width} x {height}"
            )));
        }
        self.pages.push(PdfPage {
            width,
            height,
            ops: Vec::new(),
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        x: f64,
        baseline: f64,
        text: &str,
        font: &FontSpec,
        color: Color,
    ) -> Result<()> {
        self.current_page()?.ops.push(DrawOp::Text(TextOp {
            x,
            baseline,
            text: text.to_string(),
            font: font.clone(),
            color,
        }));
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<Stroke>) -> Result<()> {
        self.current_page()?
            .ops
            .push(DrawOp::Rect(RectOp { rect, fill, stroke }));
        Ok(())
    }

    fn page_size(&self) -> Option<(f64, f64)> {
        self.pages.last().map(|p| (p.width, p.height))
    }
}

/// One font object per distinct key used, sorted for stable output.
/// Helvetica is always present so every page has a font resource.
fn register_fonts(
    objects: &mut Vec<PdfObject>,
    pages: &[PdfPage],
    fonts: &FontContext,
) -> Vec<(FontKey, usize)> {
    let mut keys: Vec<FontKey> = pages
        .iter()
        .flat_map(|page| page.texts())
        .map(|text| FontKey::for_spec(&text.font))
        .collect();
    keys.sort();
    keys.dedup();
    if keys.is_empty() {
        keys.push(FontKey::for_spec(&FontSpec::new("Helvetica", 12.0, 400)));
    }

    keys.into_iter()
        .map(|key| {
            let id = objects.len();
            let font = fonts.registry().resolve(&key.family, key.weight, key.italic);
            let dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            objects.push(PdfObject {
                data: dict.into_bytes(),
            });
            (key, id)
        })
        .collect()
}

fn content_stream(page: &PdfPage, font_objects: &[(FontKey, usize)]) -> String {
    let mut stream = String::new();
    for op in &page.ops {
        match op {
            DrawOp::Rect(RectOp { rect, fill, stroke }) => {
                let y = page.height - rect.y - rect.height;
                if let Some(fill) = fill {
                    let _ = write!(
                        stream,
                        "q\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                        fill.r, fill.g, fill.b, rect.x, y, rect.width, rect.height
                    );
                }
                if let Some(stroke) = stroke {
                    let c = stroke.color;
                    let _ = write!(
                        stream,
                        "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} {:.2} {:.2} re\nS\nQ\n",
                        c.r, c.g, c.b, stroke.width, rect.x, y, rect.width, rect.height
                    );
                }
            }
            DrawOp::Text(text) => {
                let key = FontKey::for_spec(&text.font);
                let index = font_objects
                    .iter()
                    .position(|(k, _)| *k == key)
                    .unwrap_or(0);
                let _ = write!(
                    stream,
                    "BT\n{:.3} {:.3} {:.3} rg\n/F{index} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
                    text.color.r,
                    text.color.g,
                    text.color.b,
                    text.font.size,
                    text.x,
                    page.height - text.baseline,
                    escape_pdf_string(&text.text)
                );
            }
        }
    }
    stream
}

/// Encode a string as a PDF literal in WinAnsiEncoding. Bytes above
/// 0x7E are written as octal escapes. Characters with no WinAnsi code are
/// written as `?`, the same character they were measured as.
fn escape_pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match to_winansi(ch).unwrap_or(b'?') {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b @ 0x20..=0x7E => out.push(b as char),
            b => {
                let _ = write!(out, "\\{b:03o}");
            }
        }
    }
    out
}

fn serialize(objects: &[PdfObject], info_id: usize) -> Vec<u8> {
    let mut output: Vec<u8> = Vec::new();
    let mut offsets = vec![0usize; objects.len()];

    output.extend_from_slice(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n");
    for (i, object) in objects.iter().enumerate().skip(1) {
        offsets[i] = output.len();
        let _ = write!(output, "{i} 0 obj\n");
        output.extend_from_slice(&object.data);
        output.extend_from_slice(b"\nendobj\n\n");
    }

    let xref_offset = output.len();
    let _ = write!(output, "xref\n0 {}\n0000000000 65535 f \n", objects.len());
    for offset in offsets.iter().skip(1) {
        let _ = write!(output, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        output,
        "trailer\n<< /Size {} /Root 1 0 R /Info {info_id} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len()
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::FontRole;

    fn contains(bytes: &[u8], needle: &[u8]) -> bool {
        bytes.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_pdf_string("Taxi (airport)"), "Taxi \\(airport\\)");
        assert_eq!(escape_pdf_string("a\\b"), "a\\\\b");
        assert_eq!(escape_pdf_string("Café"), "Caf\\351");
        assert_eq!(escape_pdf_string("€5"), "\\2005");
        assert_eq!(escape_pdf_string("\u{4e2d}"), "?");
    }

    #[test]
    fn single_empty_page_is_a_valid_pdf() {
        let mut doc = PdfDocument::new();
        doc.new_page(595.28, 841.89).unwrap();
        let bytes = doc.finish(&Metadata::default(), &FontContext::new());

        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(contains(&bytes, b"%%EOF"));
        assert!(contains(&bytes, b"xref"));
        assert!(contains(&bytes, b"trailer"));
        assert!(contains(&bytes, b"/Count 1"));
    }

    #[test]
    fn metadata_is_written_to_the_info_dictionary() {
        let mut doc = PdfDocument::new();
        doc.new_page(612.0, 792.0).unwrap();
        let metadata = Metadata {
            title: Some("March Trip".to_string()),
            author: Some("Accounts".to_string()),
            subject: None,
        };
        let bytes = doc.finish(&metadata, &FontContext::new());
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Title (March Trip)"));
        assert!(text.contains("/Author (Accounts)"));
        assert!(!text.contains("/Subject"));
    }

    #[test]
    fn each_font_variant_gets_its_own_object() {
        let mut doc = PdfDocument::new();
        doc.new_page(612.0, 792.0).unwrap();
        doc.draw_text(10.0, 20.0, "regular", &FontRole::Table.font(), Color::BLACK)
            .unwrap();
        doc.draw_text(10.0, 40.0, "bold", &FontRole::TableHeader.font(), Color::BLACK)
            .unwrap();
        doc.draw_text(10.0, 60.0, "again", &FontRole::Default.font(), Color::BLACK)
            .unwrap();
        let bytes = doc.finish(&Metadata::default(), &FontContext::new());
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/BaseFont /Helvetica "));
        assert!(text.contains("/BaseFont /Helvetica-Bold "));
        assert_eq!(text.matches("/Subtype /Type1").count(), 2);
    }

    #[test]
    fn drawing_without_a_page_fails() {
        let mut doc = PdfDocument::new();
        let err = doc
            .draw_text(0.0, 0.0, "x", &FontRole::Default.font(), Color::BLACK)
            .unwrap_err();
        assert!(matches!(err, FolioError::LayoutState(_)));
        assert!(doc.page_size().is_none());
    }

    #[test]
    fn content_stream_flips_the_y_axis() {
        let mut doc = PdfDocument::new();
        doc.new_page(200.0, 300.0).unwrap();
        doc.draw_text(10.0, 50.0, "hi", &FontRole::Default.font(), Color::BLACK)
            .unwrap();
        doc.draw_rect(
            Rect {
                x: 5.0,
                y: 20.0,
                width: 30.0,
                height: 40.0,
            },
            Some(Color::WHITE),
            None,
        )
        .unwrap();
        let font_objects = vec![(FontKey::for_spec(&FontRole::Default.font()), 3)];
        let stream = content_stream(&doc.pages()[0], &font_objects);
        assert!(stream.contains("10.00 250.00 Td"));
        assert!(stream.contains("5.00 240.00 30.00 40.00 re"));
    }
}
