//! Highlight engine: rule matching plus the search overlay.

use crate::error::RuleError;
use crate::rule::{CompiledRule, HighlightRule};
use crate::search::literal_regex;
use crate::types::{self, Color, FontStyle, Segment, SpanStyle, StyledSpan};

const ERROR_RED: Color = Color::rgb(0xBF, 0x61, 0x6A);
const WARN_YELLOW: Color = Color::rgb(0xEB, 0xCB, 0x8B);
const INFO_CYAN: Color = Color::rgb(0x8F, 0xBC, 0xBB);
const DEBUG_BLUE: Color = Color::rgb(0x81, 0xA1, 0xC1);

/// Level rules used when no custom rules are configured
pub fn default_rules() -> Vec<HighlightRule> {
    vec![
        HighlightRule::new(r"\b(ERROR|EXCEPTION|CRITICAL)\b", ERROR_RED).bold(),
        HighlightRule::new(r"\b(WARNING|WARN)\b", WARN_YELLOW),
        HighlightRule::new(r"\b(INFO)\b", INFO_CYAN),
        HighlightRule::new(r"\b(DEBUG|TRACE)\b", DEBUG_BLUE),
    ]
}

/// Style of search matches, applied after every rule
pub fn search_style() -> SpanStyle {
    SpanStyle {
        foreground: Some(Color::rgb(0x2E, 0x34, 0x40)),
        background: Some(Color::rgb(0xA3, 0xBE, 0x8C)),
        font: FontStyle::BOLD,
    }
}

/// Split `line` into ordered segments, the last covering span winning
pub fn resolve_segments<'a>(line: &'a str, spans: &[StyledSpan]) -> Vec<Segment<'a>> {
    types::resolve(line, spans)
}

/// Classifies log lines into styled spans.
#[derive(Debug, Clone)]
pub struct HighlightEngine {
    rules: Vec<CompiledRule>,
    search: Option<CompiledRule>,
}

impl Default for HighlightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightEngine {
    /// Engine with the built-in level rules
    pub fn new() -> Self {
        let (engine, _) = Self::with_rules(&[]);
        engine
    }

    /// Build an engine from custom rules.
    ///
    /// An empty slice selects the built-in rules. Rules that fail to compile
    /// are skipped and returned alongside the engine.
    pub fn with_rules(rules: &[HighlightRule]) -> (Self, Vec<RuleError>) {
        let mut engine = Self {
            rules: Vec::new(),
            search: None,
        };
        let errors = engine.set_rules(rules);
        (engine, errors)
    }

    /// Replace the rule set, keeping the search overlay
    pub fn set_rules(&mut self, rules: &[HighlightRule]) -> Vec<RuleError> {
        let defaults;
        let rules = if rules.is_empty() {
            defaults = default_rules();
            defaults.as_slice()
        } else {
            rules
        };

        let mut errors = Vec::new();
        self.rules = rules
            .iter()
            .filter_map(|rule| match rule.compile() {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    log::warn!("Skipping highlight rule: {}", e);
                    errors.push(e);
                    None
                }
            })
            .collect();
        log::debug!("Highlight engine loaded {} rules", self.rules.len());
        errors
    }

    /// Highlight literal occurrences of `term`; an empty term clears the overlay
    pub fn set_search(&mut self, term: &str, case_sensitive: bool) {
        if term.is_empty() {
            self.search = None;
            return;
        }
        self.search = literal_regex(term, case_sensitive)
            .map(|regex| CompiledRule {
                regex,
                style: search_style(),
            })
            .inspect_err(|e| log::warn!("Search overlay disabled: {}", e))
            .ok();
    }

    pub fn clear_search(&mut self) {
        self.search = None;
    }

    pub fn search_active(&self) -> bool {
        self.search.is_some()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Styled spans for `line` in application order: rules, then search.
    pub fn classify(&self, line: &str) -> Vec<StyledSpan> {
        self.rules
            .iter()
            .chain(self.search.iter())
            .flat_map(|rule| {
                rule.regex
                    .find_iter(line)
                    .filter(|m| !m.is_empty())
                    .map(|m| StyledSpan {
                        start: m.start(),
                        len: m.len(),
                        style: rule.style,
                    })
            })
            .collect()
    }

    /// Non-overlapping segments covering the whole line
    pub fn segments<'a>(&self, line: &'a str) -> Vec<Segment<'a>> {
        resolve_segments(line, &self.classify(line))
    }
}
