//! Terminal-independent state of the log view

use logview_highlight::{HighlightEngine, SearchHit, find_next, find_previous};
use logview_tail::TailEvent;
use std::path::{Path, PathBuf};

/// What the renderer has to print after a state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    Nothing,
    /// Clear the screen and print every kept line
    Repaint,
    /// Print the kept lines from this index on
    Append(usize),
    /// Print the line of a search match
    Jump(SearchHit),
    /// Status message, not part of the log content
    Notice(String),
}

/// Lines shown on screen, capped at `render_cap`.
///
/// The worker keeps the full history; the view only keeps what it renders.
#[derive(Debug)]
pub struct LogView {
    lines: Vec<String>,
    render_cap: usize,
    path: Option<PathBuf>,
    engine: HighlightEngine,
    search: String,
    case_sensitive: bool,
    hit: Option<SearchHit>,
}

impl LogView {
    pub fn new(engine: HighlightEngine, render_cap: usize) -> Self {
        Self {
            lines: Vec::new(),
            render_cap: render_cap.max(1),
            path: None,
            engine,
            search: String::new(),
            case_sensitive: false,
            hit: None,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn engine(&self) -> &HighlightEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut HighlightEngine {
        &mut self.engine
    }

    pub fn apply(&mut self, event: TailEvent) -> ViewUpdate {
        match event {
            TailEvent::FileLoaded(path) => {
                let notice = format!("Monitoring {}", path.display());
                self.path = Some(path);
                self.lines.clear();
                self.search.clear();
                self.engine.clear_search();
                self.hit = None;
                ViewUpdate::Notice(notice)
            }
            TailEvent::FullReplace(lines) => {
                self.lines = lines;
                self.hit = None;
                self.enforce_cap();
                ViewUpdate::Repaint
            }
            TailEvent::Batch(lines) => {
                if lines.is_empty() {
                    return ViewUpdate::Nothing;
                }
                let added = lines.len();
                self.lines.extend(lines);
                self.enforce_cap();
                ViewUpdate::Append(self.lines.len().saturating_sub(added))
            }
            TailEvent::Error(message) => ViewUpdate::Notice(format!("Error: {}", message)),
            TailEvent::Stopped => ViewUpdate::Notice("Monitoring stopped".to_string()),
        }
    }

    /// Set the search term and jump to its first match
    pub fn search(&mut self, term: &str) -> Vec<ViewUpdate> {
        self.search = term.to_string();
        self.hit = None;
        self.engine.set_search(term, self.case_sensitive);
        if term.is_empty() {
            return vec![ViewUpdate::Repaint];
        }
        vec![ViewUpdate::Repaint, self.jump(true)]
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Flip search case sensitivity and re-run the active search
    pub fn toggle_case(&mut self) -> Vec<ViewUpdate> {
        self.case_sensitive = !self.case_sensitive;
        let notice = ViewUpdate::Notice(format!(
            "Search is case {}",
            if self.case_sensitive { "sensitive" } else { "insensitive" }
        ));
        if self.search.is_empty() {
            return vec![notice];
        }
        let term = std::mem::take(&mut self.search);
        let mut updates = self.search(&term);
        updates.push(notice);
        updates
    }

    pub fn next_match(&mut self) -> ViewUpdate {
        self.jump(true)
    }

    pub fn previous_match(&mut self) -> ViewUpdate {
        self.jump(false)
    }

    fn jump(&mut self, forward: bool) -> ViewUpdate {
        if self.search.is_empty() {
            return ViewUpdate::Notice("No active search, use :search TERM".to_string());
        }
        let found = if forward {
            find_next(&self.lines, &self.search, self.case_sensitive, self.hit)
        } else {
            find_previous(&self.lines, &self.search, self.case_sensitive, self.hit)
        };
        self.hit = found;
        match found {
            Some(hit) => ViewUpdate::Jump(hit),
            None => ViewUpdate::Notice(format!("'{}' not found", self.search)),
        }
    }

    /// Drop the oldest lines beyond the cap; a kept search hit moves with them
    fn enforce_cap(&mut self) {
        let excess = self.lines.len().saturating_sub(self.render_cap);
        if excess == 0 {
            return;
        }
        self.lines.drain(..excess);
        self.hit = self.hit.and_then(|hit| {
            hit.line.checked_sub(excess).map(|line| SearchHit { line, ..hit })
        });
    }
}
