//! Highlight rule model
//!
//! A rule pairs a regular expression with the style applied to its matches.
//! Rules are stored as JSON objects:
//!
//! ```json
//! { "pattern": "timeout", "color": "#D08770", "background": "", "bold": true }
//! ```

use crate::error::RuleError;
use crate::types::{Color, FontStyle, SpanStyle};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer, Serialize};

/// A user-defined (or built-in) highlight rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRule {
    /// Regular expression matched against each line
    pub pattern: String,
    /// Foreground color
    pub color: Color,
    /// Background color, `""` or absent means none
    #[serde(
        default,
        deserialize_with = "empty_color_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub background: Option<Color>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub case_sensitive: bool,
}

fn empty_color_as_none<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl HighlightRule {
    /// Case-insensitive rule with no background and regular weight
    pub fn new(pattern: impl Into<String>, color: Color) -> Self {
        Self {
            pattern: pattern.into(),
            color,
            background: None,
            bold: false,
            italic: false,
            case_sensitive: false,
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn style(&self) -> SpanStyle {
        let mut font = FontStyle::empty();
        font.set(FontStyle::BOLD, self.bold);
        font.set(FontStyle::ITALIC, self.italic);
        SpanStyle {
            foreground: Some(self.color),
            background: self.background,
            font,
        }
    }

    /// Check the rule can be saved: non-empty pattern that compiles
    pub fn validate(&self) -> Result<(), RuleError> {
        self.compile().map(|_| ())
    }

    pub(crate) fn compile(&self) -> Result<CompiledRule, RuleError> {
        if self.pattern.trim().is_empty() {
            return Err(RuleError::EmptyPattern);
        }
        let regex = RegexBuilder::new(&self.pattern)
            .case_insensitive(!self.case_sensitive)
            .build()
            .map_err(|source| RuleError::InvalidPattern {
                pattern: self.pattern.clone(),
                source,
            })?;
        Ok(CompiledRule {
            regex,
            style: self.style(),
        })
    }
}

/// A rule ready for matching
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) regex: Regex,
    pub(crate) style: SpanStyle,
}
