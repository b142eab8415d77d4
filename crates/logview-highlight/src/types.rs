//! Type definitions for highlighted log lines

use crate::error::RuleError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 24-bit color, written as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = RuleError;

    /// Accepts `#RRGGBB` and the short `#RGB` form, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RuleError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Color::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Color::rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

bitflags! {
    /// Font attributes of a styled span
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FontStyle: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
    }
}

impl Default for FontStyle {
    fn default() -> Self {
        Self::empty()
    }
}

/// Complete formatting of a span. Applying a style replaces any earlier one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SpanStyle {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub font: FontStyle,
}

impl SpanStyle {
    pub fn is_bold(&self) -> bool {
        self.font.contains(FontStyle::BOLD)
    }

    pub fn is_italic(&self) -> bool {
        self.font.contains(FontStyle::ITALIC)
    }
}

/// A styled byte range of a line, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSpan {
    /// Byte offset of the first matched character
    pub start: usize,
    /// Length in bytes
    pub len: usize,
    pub style: SpanStyle,
}

impl StyledSpan {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    fn covers(&self, start: usize, end: usize) -> bool {
        self.start <= start && end <= self.end()
    }
}

/// Piece of a line with its resolved style; `None` is unstyled text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub style: Option<SpanStyle>,
}

/// Resolve overlapping spans into ordered, non-overlapping segments.
///
/// The last span covering a region wins, matching how each applied format
/// replaces the previous one.
pub(crate) fn resolve<'a>(line: &'a str, spans: &[StyledSpan]) -> Vec<Segment<'a>> {
    let mut bounds: Vec<usize> = vec![0, line.len()];
    for span in spans.iter().filter(|s| s.end() <= line.len()) {
        bounds.push(span.start);
        bounds.push(span.end());
    }
    bounds.sort_unstable();
    bounds.dedup();

    let mut ranges: Vec<(usize, usize, Option<SpanStyle>)> = Vec::new();
    for window in bounds.windows(2) {
        let (start, end) = (window[0], window[1]);
        let style = spans
            .iter()
            .rev()
            .find(|span| span.covers(start, end))
            .map(|span| span.style);

        match ranges.last_mut() {
            Some(last) if last.2 == style => last.1 = end,
            _ => ranges.push((start, end, style)),
        }
    }

    ranges
        .into_iter()
        .map(|(start, end, style)| Segment {
            text: &line[start..end],
            style,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_color_parse() {
        assert_eq!("#BF616A".parse::<Color>().unwrap(), Color::rgb(0xBF, 0x61, 0x6A));
        assert_eq!("#bf616a".parse::<Color>().unwrap(), Color::rgb(0xBF, 0x61, 0x6A));
        assert_eq!("#F0A".parse::<Color>().unwrap(), Color::rgb(0xFF, 0x00, 0xAA));
        assert!("BF616A".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_display_is_uppercase_hex() {
        assert_eq!(Color::rgb(0x2e, 0x34, 0x40).to_string(), "#2E3440");
    }

    #[test]
    fn test_color_serde_as_string() {
        let json = serde_json::to_string(&Color::rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let parsed: Color = serde_json::from_str("\"#A3BE8C\"").unwrap();
        assert_eq!(parsed, Color::rgb(0xA3, 0xBE, 0x8C));
        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }

    fn span(start: usize, len: usize, r: u8) -> StyledSpan {
        StyledSpan {
            start,
            len,
            style: SpanStyle {
                foreground: Some(Color::rgb(r, 0, 0)),
                ..SpanStyle::default()
            },
        }
    }

    #[test]
    fn test_resolve_without_spans() {
        let segments = resolve("plain", &[]);
        assert_eq!(
            segments,
            vec![Segment {
                text: "plain",
                style: None
            }]
        );
        assert!(resolve("", &[]).is_empty());
    }

    #[test]
    fn test_resolve_last_span_wins() {
        let line = "0123456789";
        let first = span(0, 6, 1);
        let second = span(4, 4, 2);
        let segments = resolve(line, &[first, second]);

        let texts: Vec<&str> = segments.iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["0123", "4567", "89"]);
        assert_eq!(segments[0].style, Some(first.style));
        assert_eq!(segments[1].style, Some(second.style));
        assert_eq!(segments[2].style, None);
    }

    #[test]
    fn test_resolve_merges_adjacent_equal_styles() {
        let line = "abcdef";
        let segments = resolve(line, &[span(0, 2, 1), span(2, 2, 1)]);
        let texts: Vec<&str> = segments.iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["abcd", "ef"]);
    }
}
