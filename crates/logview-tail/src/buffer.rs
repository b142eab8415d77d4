//! Line history and pending batch

use crate::filter::FilterState;

/// Complete unfiltered history of the current file plus the queue of
/// visible lines not yet delivered to the consumer.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    history: Vec<String>,
    pending: Vec<String>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a live line, queueing it for delivery if the filter lets it through.
    ///
    /// Returns whether the line is visible.
    pub fn push(&mut self, line: String, filter: &FilterState) -> bool {
        let visible = filter.matches(&line);
        if visible {
            self.pending.push(line.clone());
        }
        self.history.push(line);
        visible
    }

    /// Append lines to the history only. They reach the consumer through a
    /// full replace rather than a batch.
    pub fn extend_history<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.history.extend(lines);
    }

    /// Take the pending batch, or `None` if nothing is queued
    pub fn take_pending(&mut self) -> Option<Vec<String>> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }

    /// Drop queued lines that a full replace is about to cover
    pub fn discard_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Clear history and queue, leaving `marker` as the only record
    pub fn reset_with_marker(&mut self, marker: &str) {
        self.history.clear();
        self.pending.clear();
        self.history.push(marker.to_string());
    }

    /// Snapshot of the history visible under `filter`
    pub fn visible(&self, filter: &FilterState) -> Vec<String> {
        filter.apply(&self.history)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
