//! # Text Layout
//!
//! Greedy line breaking for text cells.
//!
//! Break opportunities come from UAX#14. A word wider than the whole line
//! is force-broken between characters, so no line is ever wider than the
//! width it was broken for (unless a single character is).

use crate::font::FontContext;
use crate::style::FontSpec;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    pub text: String,
    /// Width of the line, excluding trailing spaces.
    pub width: f64,
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Entry `i` is the break opportunity *before* `chars[i]`. Index 0 is
/// always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    let mut byte_to_char = vec![0usize; text.len() + 1];
    let mut char_idx = 0;
    for (byte_idx, _) in text.char_indices() {
        byte_to_char[byte_idx] = char_idx;
        char_idx += 1;
    }
    byte_to_char[text.len()] = char_idx;

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextLayout;

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Break `text` into lines that fit within `max_width`.
    ///
    /// Always returns at least one line; empty text yields one empty line
    /// so that an empty cell still occupies a line of height.
    pub fn break_into_lines(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        font: &FontSpec,
    ) -> Vec<BrokenLine> {
        if text.is_empty() {
            return vec![BrokenLine {
                text: String::new(),
                width: 0.0,
            }];
        }

        let chars: Vec<char> = text.chars().collect();
        let widths: Vec<f64> = chars
            .iter()
            .map(|&ch| {
                if is_newline(ch) {
                    0.0
                } else {
                    font_context.char_width(ch, font)
                }
            })
            .collect();
        let break_opps = compute_break_opportunities(text);

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut last_break_point: Option<usize> = None;

        for (i, &ch) in chars.iter().enumerate() {
            if i > 0 {
                match break_opps[i] {
                    Some(BreakOpportunity::Mandatory) => {
                        lines.push(make_line(&chars[line_start..i], &widths[line_start..i]));
                        line_start = i;
                        line_width = 0.0;
                        last_break_point = None;
                    }
                    Some(BreakOpportunity::Allowed) => {
                        last_break_point = Some(i);
                    }
                    None => {}
                }
            }

            if is_newline(ch) {
                continue;
            }

            // Trailing spaces may hang past the edge
            if ch != ' ' && line_width + widths[i] > max_width && line_start < i {
                let break_at = match last_break_point {
                    Some(bp) if bp > line_start => bp,
                    // No break opportunity on this line: force break here
                    _ => i,
                };
                lines.push(make_line(
                    &chars[line_start..break_at],
                    &widths[line_start..break_at],
                ));
                line_start = break_at;
                line_width = widths[line_start..=i].iter().sum();
                last_break_point = None;
                continue;
            }

            line_width += widths[i];
        }

        if line_start < chars.len() {
            lines.push(make_line(&chars[line_start..], &widths[line_start..]));
        }

        lines
    }
}

/// Build a line, dropping newline characters and not counting trailing spaces.
fn make_line(chars: &[char], widths: &[f64]) -> BrokenLine {
    let mut end = chars.len();
    while end > 0 && is_newline(chars[end - 1]) {
        end -= 1;
    }
    let mut effective_end = end;
    while effective_end > 0 && chars[effective_end - 1] == ' ' {
        effective_end -= 1;
    }

    BrokenLine {
        text: chars[..end].iter().collect(),
        width: widths[..effective_end].iter().sum(),
    }
}
