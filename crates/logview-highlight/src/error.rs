use thiserror::Error;

/// Errors raised when a highlight rule is built or edited
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Highlight pattern must not be empty")]
    EmptyPattern,

    #[error("Invalid highlight pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),

    #[error("No highlight rule at index {0}")]
    NoSuchRule(usize),
}
