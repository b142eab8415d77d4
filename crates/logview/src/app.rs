//! Command execution against the tail worker, the view and the rule store

use crate::commands::{self, Command};
use crate::view::{LogView, ViewUpdate};
use anyhow::Result;
use logview_config::list_log_files;
use logview_highlight::{HighlightRule, RuleSet, RuleStore};
use logview_tail::{FilterMode, TailEvent, TailHandle};
use std::path::PathBuf;

pub enum Flow {
    Continue(Vec<ViewUpdate>),
    Quit,
}

pub struct App {
    handle: TailHandle,
    view: LogView,
    rules: RuleSet,
    store: RuleStore,
    log_directory: PathBuf,
}

impl App {
    pub fn new(handle: TailHandle, view: LogView, store: RuleStore, log_directory: PathBuf) -> Self {
        let rules = RuleSet::new(store.load());
        Self {
            handle,
            view,
            rules,
            store,
            log_directory,
        }
    }

    pub fn view(&self) -> &LogView {
        &self.view
    }

    pub fn handle(&self) -> &TailHandle {
        &self.handle
    }

    pub fn on_event(&mut self, event: TailEvent) -> ViewUpdate {
        self.view.apply(event)
    }

    /// Parse and run one input line; failures become notices
    pub fn on_input(&mut self, input: &str) -> Flow {
        let result = commands::parse(input).and_then(|command| match command {
            Some(command) => self.execute(command),
            None => Ok(Flow::Continue(Vec::new())),
        });
        result.unwrap_or_else(|e| {
            log::debug!("Command '{}' failed: {:#}", input.trim(), e);
            Flow::Continue(vec![ViewUpdate::Notice(format!("{:#}", e))])
        })
    }

    fn execute(&mut self, command: Command) -> Result<Flow> {
        log::debug!("Executing {:?}", command);
        let updates = match command {
            Command::Open(path) => {
                self.handle.set_log_file(path)?;
                Vec::new()
            }
            Command::List(query) => list_log_files(&self.log_directory)?
                .into_iter()
                .filter(|entry| entry.matches_name(&query))
                .map(|entry| {
                    let modified = entry
                        .modified
                        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    ViewUpdate::Notice(format!("{}  {}", modified, entry.path.display()))
                })
                .collect(),
            Command::Filter(term) => {
                self.handle.set_filter(&term, FilterMode::Include)?;
                Vec::new()
            }
            Command::Exclude(term) => {
                self.handle.set_filter(&term, FilterMode::Exclude)?;
                Vec::new()
            }
            Command::NoFilter => {
                self.handle.set_filter("", FilterMode::Include)?;
                Vec::new()
            }
            Command::Search(term) => self.view.search(&term),
            Command::ToggleCase => self.view.toggle_case(),
            Command::Next => vec![self.view.next_match()],
            Command::Prev => vec![self.view.previous_match()],
            Command::Rules => self.list_rules(),
            Command::AddRule { color, pattern } => {
                self.rules.add(HighlightRule::new(pattern, color))?;
                self.save_rules()?
            }
            Command::RemoveRule(index) => {
                self.rules.remove(index)?;
                self.save_rules()?
            }
            Command::Stop => {
                self.handle.stop()?;
                Vec::new()
            }
            Command::Help => commands::help().into_iter().map(ViewUpdate::Notice).collect(),
            Command::Quit => return Ok(Flow::Quit),
        };
        Ok(Flow::Continue(updates))
    }

    fn list_rules(&self) -> Vec<ViewUpdate> {
        if self.rules.is_empty() {
            return vec![ViewUpdate::Notice(
                "No custom rules, using the built-in level colors".to_string(),
            )];
        }
        self.rules
            .rules()
            .iter()
            .enumerate()
            .map(|(i, rule)| ViewUpdate::Notice(format!("{}. {} {}", i + 1, rule.color, rule.pattern)))
            .collect()
    }

    /// Persist the rules and re-highlight with them
    fn save_rules(&mut self) -> Result<Vec<ViewUpdate>> {
        self.store.save(self.rules.rules())?;
        for error in self.view.engine_mut().set_rules(self.rules.rules()) {
            log::warn!("Saved rule is not usable: {}", error);
        }
        Ok(vec![ViewUpdate::Repaint])
    }
}
