//! Stdin command parsing
//!
//! Commands are typed as `:verb [argument]`, e.g. `:filter timeout`.

use anyhow::{Context, Result, anyhow, bail};
use logview_highlight::Color;
use std::path::PathBuf;
use strum::{Display, EnumIter, EnumMessage, EnumString, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, EnumMessage)]
enum Verb {
    #[strum(to_string = "open", message = "PATH  follow another log file")]
    Open,
    #[strum(to_string = "list", message = "[QUERY]  list log files of the log directory")]
    List,
    #[strum(to_string = "filter", message = "TERM  show only lines containing TERM")]
    Filter,
    #[strum(to_string = "exclude", message = "TERM  hide lines containing TERM")]
    Exclude,
    #[strum(to_string = "nofilter", message = "show every line")]
    NoFilter,
    #[strum(to_string = "search", message = "TERM  highlight TERM and jump to its first match")]
    Search,
    #[strum(to_string = "case", message = "toggle case sensitive search")]
    Case,
    #[strum(to_string = "next", serialize = "n", message = "jump to the next match")]
    Next,
    #[strum(to_string = "prev", serialize = "p", message = "jump to the previous match")]
    Prev,
    #[strum(to_string = "rules", message = "list custom highlight rules")]
    Rules,
    #[strum(to_string = "rule-add", message = "#RRGGBB PATTERN  add a highlight rule")]
    RuleAdd,
    #[strum(to_string = "rule-rm", message = "N  remove highlight rule N")]
    RuleRemove,
    #[strum(to_string = "stop", message = "stop monitoring the current file")]
    Stop,
    #[strum(to_string = "help", serialize = "h", message = "show this help")]
    Help,
    #[strum(to_string = "quit", serialize = "q", message = "exit")]
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    /// Optional file name query, empty lists everything
    List(String),
    Filter(String),
    Exclude(String),
    NoFilter,
    Search(String),
    ToggleCase,
    Next,
    Prev,
    Rules,
    AddRule { color: Color, pattern: String },
    /// Zero-based rule index
    RemoveRule(usize),
    Stop,
    Help,
    Quit,
}

/// Parse one input line. Blank input yields `None`.
pub fn parse(input: &str) -> Result<Option<Command>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let Some(rest) = input.strip_prefix(':') else {
        bail!("Commands start with ':', try :help");
    };
    let (verb, arg) = match rest.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (rest, ""),
    };
    let verb: Verb = verb
        .parse()
        .map_err(|_| anyhow!("Unknown command ':{}', try :help", verb))?;

    let command = match verb {
        Verb::Open => Command::Open(PathBuf::from(required(verb, arg)?)),
        Verb::List => Command::List(arg.to_string()),
        Verb::Filter => Command::Filter(arg.to_string()),
        Verb::Exclude => Command::Exclude(arg.to_string()),
        Verb::NoFilter => Command::NoFilter,
        Verb::Search => Command::Search(arg.to_string()),
        Verb::Case => Command::ToggleCase,
        Verb::Next => Command::Next,
        Verb::Prev => Command::Prev,
        Verb::Rules => Command::Rules,
        Verb::RuleAdd => {
            let (color, pattern) = required(verb, arg)?
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("Usage: :rule-add #RRGGBB PATTERN"))?;
            Command::AddRule {
                color: color.parse()?,
                pattern: pattern.trim().to_string(),
            }
        }
        Verb::RuleRemove => {
            let number: usize = required(verb, arg)?
                .parse()
                .context("Rule number must be a positive integer")?;
            let index = number
                .checked_sub(1)
                .ok_or_else(|| anyhow!("Rules are numbered from 1"))?;
            Command::RemoveRule(index)
        }
        Verb::Stop => Command::Stop,
        Verb::Help => Command::Help,
        Verb::Quit => Command::Quit,
    };
    Ok(Some(command))
}

fn required(verb: Verb, arg: &str) -> Result<&str> {
    if arg.is_empty() {
        bail!(":{} needs an argument", verb);
    }
    Ok(arg)
}

/// One line per command
pub fn help() -> Vec<String> {
    Verb::iter()
        .map(|verb| format!(":{:<10} {}", verb.to_string(), verb.get_message().unwrap_or_default()))
        .collect()
}
