//! Line filter
//!
//! A single case-insensitive substring predicate in include or exclude mode.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Whether matching lines are kept or dropped
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FilterMode {
    /// Show only lines containing the term
    #[default]
    Include,
    /// Hide lines containing the term
    Exclude,
}

/// Active filter. An empty term disables filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Stored lowercased
    term: String,
    mode: FilterMode,
}

impl FilterState {
    pub fn new(term: impl AsRef<str>, mode: FilterMode) -> Self {
        Self {
            term: term.as_ref().to_lowercase(),
            mode,
        }
    }

    /// Filter that lets every line through
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        !self.term.is_empty()
    }

    /// Check whether `line` is visible under this filter
    pub fn matches(&self, line: &str) -> bool {
        if self.term.is_empty() {
            return true;
        }

        let contains = line.to_lowercase().contains(&self.term);
        match self.mode {
            FilterMode::Include => contains,
            FilterMode::Exclude => !contains,
        }
    }

    /// Visible subset of `lines`, in order
    pub fn apply<'a, I>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        lines
            .into_iter()
            .filter(|line| self.matches(line))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn history() -> Vec<String> {
        ["a", "ERROR b", "c", "error d"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let filter = FilterState::disabled();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&history()), history());

        let filter = FilterState::new("", FilterMode::Exclude);
        assert_eq!(filter.apply(&history()), history());
    }

    #[test]
    fn test_include_is_case_insensitive() {
        let filter = FilterState::new("ERROR", FilterMode::Include);
        assert_eq!(filter.term(), "error");
        assert_eq!(filter.apply(&history()), vec!["ERROR b", "error d"]);
    }

    #[test]
    fn test_exclude() {
        let filter = FilterState::new("Error", FilterMode::Exclude);
        assert_eq!(filter.apply(&history()), vec!["a", "c"]);
    }

    #[test]
    fn test_modes_are_complementary() {
        let lines = history();
        let include = FilterState::new("error", FilterMode::Include);
        let exclude = FilterState::new("error", FilterMode::Exclude);

        for line in &lines {
            assert_ne!(include.matches(line), exclude.matches(line));
        }
        assert_eq!(
            include.apply(&lines).len() + exclude.apply(&lines).len(),
            lines.len()
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        let filter = FilterState::new("b", FilterMode::Include);
        let once = filter.apply(&history());
        let twice = filter.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("include".parse::<FilterMode>().unwrap(), FilterMode::Include);
        assert_eq!("EXCLUDE".parse::<FilterMode>().unwrap(), FilterMode::Exclude);
        assert!("both".parse::<FilterMode>().is_err());
        assert_eq!(FilterMode::Exclude.to_string(), "exclude");
    }
}
