//! Log Line Highlighting
//!
//! Cosmetic, regex based styling of log lines:
//! - Built-in level rules (ERROR, WARN, INFO, DEBUG ...)
//! - User rules persisted as JSON, validated when edited
//! - A transient search overlay that always wins on overlap
//!
//! # Example
//!
//! ```
//! use logview_highlight::HighlightEngine;
//!
//! let mut engine = HighlightEngine::new();
//! engine.set_search("disk", false);
//!
//! for segment in engine.segments("WARN disk almost full") {
//!     // segment.text with optional segment.style
//!     let _ = (segment.text, segment.style);
//! }
//! ```

mod engine;
mod error;
mod rule;
mod search;
mod store;
mod types;

pub use engine::{HighlightEngine, default_rules, resolve_segments, search_style};
pub use error::RuleError;
pub use rule::HighlightRule;
pub use search::{SearchHit, find_next, find_previous};
pub use store::{RuleSet, RuleStore};
pub use types::{Color, FontStyle, Segment, SpanStyle, StyledSpan};
