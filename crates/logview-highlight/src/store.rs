//! Highlight rule persistence and editing
//!
//! Rules live in a pretty-printed JSON array. A missing or unreadable file is
//! not an error: it yields an empty set, which selects the built-in rules.

use crate::error::RuleError;
use crate::rule::HighlightRule;
use anyhow::Context;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// JSON file holding the custom highlight rules
#[derive(Debug, Clone)]
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load rules from disk.
    ///
    /// Returns an empty vector if the file doesn't exist or isn't a JSON
    /// array. Entries that don't describe a rule are skipped one by one.
    pub fn load(&self) -> Vec<HighlightRule> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(_) => {
                log::debug!("No highlight rules file at {}", self.path.display());
                return Vec::new();
            }
        };
        let entries: Vec<serde_json::Value> = match serde_json::from_reader(BufReader::new(file)) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!(
                    "Failed to parse highlight rules file {}: {}",
                    self.path.display(),
                    e
                );
                return Vec::new();
            }
        };

        let rules: Vec<HighlightRule> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value(entry) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    log::warn!(
                        "Skipping highlight rule {} in {}: {}",
                        i + 1,
                        self.path.display(),
                        e
                    );
                    None
                }
            })
            .collect();
        log::info!(
            "Loaded {} highlight rules from {}",
            rules.len(),
            self.path.display()
        );
        rules
    }

    /// Save rules to disk, creating the parent directory if needed
    pub fn save(&self, rules: &[HighlightRule]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        serde_json::to_writer_pretty(file, rules)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        log::info!(
            "Saved {} highlight rules to {}",
            rules.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Editable list of custom rules; every edit is validated first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<HighlightRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<HighlightRule>) -> Self {
        Self { rules }
    }

    pub fn add(&mut self, rule: HighlightRule) -> Result<(), RuleError> {
        rule.validate()?;
        self.rules.push(rule);
        Ok(())
    }

    pub fn update(&mut self, index: usize, rule: HighlightRule) -> Result<(), RuleError> {
        rule.validate()?;
        let slot = self
            .rules
            .get_mut(index)
            .ok_or(RuleError::NoSuchRule(index))?;
        *slot = rule;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<HighlightRule, RuleError> {
        if index >= self.rules.len() {
            return Err(RuleError::NoSuchRule(index));
        }
        Ok(self.rules.remove(index))
    }

    pub fn rules(&self) -> &[HighlightRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
