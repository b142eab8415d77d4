use anyhow::Context;
use logview_config::{AppConfig, newest_log_file};
use logview_highlight::{HighlightEngine, RuleStore};
use logview_tail::spawn_tail_worker;
use std::io;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

mod app;
mod commands;
mod logger;
mod render;
mod view;

use app::{App, Flow};
use view::{LogView, ViewUpdate};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_file = logger::init()?;
    log::info!("Starting logview, logging to {}", log_file.display());

    let config = AppConfig::load();
    let store = RuleStore::new(config.highlight_rules_path()?);
    let (engine, rule_errors) = HighlightEngine::with_rules(&store.load());

    let (tx, mut events) = mpsc::unbounded_channel();
    let (handle, worker) = spawn_tail_worker(tx, config.tail.clone());
    let view = LogView::new(engine, config.render_cap);
    let mut app = App::new(handle, view, store, config.log_directory.clone());

    let mut out = io::stdout();
    for error in rule_errors {
        render::render(&mut out, app.view(), &ViewUpdate::Notice(error.to_string()))?;
    }

    match initial_file(&config) {
        Some(path) => app.handle().set_log_file(path)?,
        None => render::render(
            &mut out,
            app.view(),
            &ViewUpdate::Notice("No log file found, use :open PATH or :help".to_string()),
        )?,
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                let update = app.on_event(event);
                render::render(&mut out, app.view(), &update)?;
            }
            line = input.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    log::info!("Stdin closed");
                    break;
                };
                match app.on_input(&line) {
                    Flow::Continue(updates) => {
                        for update in &updates {
                            render::render(&mut out, app.view(), update)?;
                        }
                    }
                    Flow::Quit => break,
                }
            }
        }
    }

    // Worker may already be gone if every handle was dropped
    if let Err(e) = app.handle().shutdown() {
        log::debug!("Shutdown signal not delivered: {}", e);
    }
    worker.await.context("Tail worker panicked")?;
    while let Ok(event) = events.try_recv() {
        let update = app.on_event(event);
        render::render(&mut out, app.view(), &update)?;
    }

    log::info!("Exiting logview");
    Ok(())
}

/// File given on the command line, else the newest file of the log directory
fn initial_file(config: &AppConfig) -> Option<PathBuf> {
    if let Some(arg) = std::env::args_os().nth(1) {
        return Some(PathBuf::from(arg));
    }
    match newest_log_file(&config.log_directory) {
        Ok(path) => path,
        Err(e) => {
            log::warn!("Could not scan log directory: {:#}", e);
            None
        }
    }
}
