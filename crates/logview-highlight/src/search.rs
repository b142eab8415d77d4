//! Search navigation over the visible lines
//!
//! Matches are literal substrings, folded the same way as the search overlay
//! of the highlight engine. Both directions wrap around the ends.

use regex::{Regex, RegexBuilder};

/// Position of a search match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    /// Index into the searched lines
    pub line: usize,
    /// Byte offset of the match within the line
    pub start: usize,
    /// Match length in bytes
    pub len: usize,
}

/// Regex matching `term` literally
pub(crate) fn literal_regex(term: &str, case_sensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(!case_sensitive)
        .build()
}

fn compile(term: &str, case_sensitive: bool) -> Option<Regex> {
    if term.is_empty() {
        return None;
    }
    literal_regex(term, case_sensitive)
        .inspect_err(|e| log::warn!("Search term '{}' not usable: {}", term, e))
        .ok()
}

/// All matches in one line, in order
fn line_hits(regex: &Regex, line: &str, index: usize) -> Vec<SearchHit> {
    regex
        .find_iter(line)
        .filter(|m| !m.is_empty())
        .map(|m| SearchHit {
            line: index,
            start: m.start(),
            len: m.len(),
        })
        .collect()
}

fn position(hit: &SearchHit) -> (usize, usize) {
    (hit.line, hit.start)
}

/// First match after `after`, wrapping to the top. `None` starts at the top.
pub fn find_next(
    lines: &[String],
    term: &str,
    case_sensitive: bool,
    after: Option<SearchHit>,
) -> Option<SearchHit> {
    let regex = compile(term, case_sensitive)?;
    let origin = after.as_ref().map(position);
    let mut first = None;
    for (index, line) in lines.iter().enumerate() {
        for hit in line_hits(&regex, line, index) {
            match origin {
                Some(origin) if position(&hit) <= origin => {
                    first.get_or_insert(hit);
                }
                _ => return Some(hit),
            }
        }
    }
    first
}

/// Last match before `before`, wrapping to the bottom. `None` starts at the bottom.
pub fn find_previous(
    lines: &[String],
    term: &str,
    case_sensitive: bool,
    before: Option<SearchHit>,
) -> Option<SearchHit> {
    let regex = compile(term, case_sensitive)?;
    let origin = before.as_ref().map(position);
    let mut last = None;
    for (index, line) in lines.iter().enumerate().rev() {
        for hit in line_hits(&regex, line, index).into_iter().rev() {
            match origin {
                Some(origin) if position(&hit) >= origin => {
                    last.get_or_insert(hit);
                }
                _ => return Some(hit),
            }
        }
    }
    last
}
