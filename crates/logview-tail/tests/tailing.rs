//! End-to-end behaviour of a tail session against real files

use logview_tail::{
    FilterMode, FilterState, ReaderState, TRUNCATION_MARKER, TailEvent, TailSession, TailSettings,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

fn create(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("service.log");
    fs::write(&path, content).unwrap();
    path
}

fn append(path: &Path, content: &str) {
    let mut file = fs::OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
}

fn open(path: &Path, filter: FilterState, events: &mut Vec<TailEvent>) -> TailSession {
    TailSession::open(
        path,
        &TailSettings::default(),
        filter,
        Arc::new(AtomicBool::new(false)),
        events,
    )
    .unwrap()
}

fn batches(events: &[TailEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            TailEvent::Batch(lines) => Some(lines.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}

#[test]
fn history_is_the_concatenation_of_appended_lines() {
    let dir = TempDir::new().unwrap();
    let path = create(&dir, "");
    let mut events = Vec::new();
    let mut session = open(&path, FilterState::disabled(), &mut events);

    let mut expected = Vec::new();
    for round in 0..5 {
        let chunk: Vec<String> = (0..7).map(|i| format!("round {round} line {i}")).collect();
        append(&path, &format!("{}\n", chunk.join("\n")));
        expected.extend(chunk);
        session.poll_cycle(&mut events).unwrap();
        if round % 2 == 0 {
            session.flush(&mut events);
        }
    }
    session.flush(&mut events);

    assert_eq!(session.history(), expected.as_slice());
    assert_eq!(batches(&events), expected);
}

#[test]
fn batches_carry_exactly_the_lines_that_pass_the_filter() {
    let dir = TempDir::new().unwrap();
    let path = create(&dir, "");
    let mut events = Vec::new();
    let filter = FilterState::new("warn", FilterMode::Include);
    let mut session = open(&path, filter.clone(), &mut events);

    let lines = [
        "INFO boot",
        "WARN slow disk",
        "INFO tick",
        "warn retry 1",
        "ERROR fatal",
        "Warning: low memory",
    ];
    for line in lines {
        append(&path, &format!("{line}\n"));
        session.poll_cycle(&mut events).unwrap();
    }
    session.flush(&mut events);

    let expected: Vec<String> = lines
        .iter()
        .filter(|line| filter.matches(line))
        .map(|line| line.to_string())
        .collect();
    assert_eq!(
        expected,
        vec!["WARN slow disk", "warn retry 1", "Warning: low memory"]
    );
    assert_eq!(batches(&events), expected);
}

#[test]
fn include_and_exclude_partition_the_history() {
    let dir = TempDir::new().unwrap();
    let path = create(&dir, "alpha\nbeta ERROR\ngamma\nerror delta\nepsilon\n");
    let mut events = Vec::new();
    let mut session = open(&path, FilterState::disabled(), &mut events);
    events.clear();

    session.apply_filter(FilterState::new("error", FilterMode::Include), &mut events);
    session.apply_filter(FilterState::new("error", FilterMode::Exclude), &mut events);
    session.apply_filter(FilterState::new("error", FilterMode::Exclude), &mut events);

    let [
        TailEvent::FullReplace(included),
        TailEvent::FullReplace(excluded),
        TailEvent::FullReplace(excluded_again),
    ] = events.as_slice()
    else {
        panic!("expected three full replaces, got {:?}", events);
    };

    assert_eq!(excluded, excluded_again);
    assert!(included.iter().all(|line| !excluded.contains(line)));
    let mut union: Vec<String> = session
        .history()
        .iter()
        .filter(|line| included.contains(line) || excluded.contains(line))
        .cloned()
        .collect();
    union.dedup();
    assert_eq!(union.as_slice(), session.history());
}

#[test]
fn truncation_resets_history_to_marker_and_new_content() {
    let dir = TempDir::new().unwrap();
    let path = create(&dir, "old 1\nold 2\nold 3\n");
    let mut events = Vec::new();
    let mut session = open(&path, FilterState::disabled(), &mut events);
    append(&path, "old 4\n");
    session.poll_cycle(&mut events).unwrap();
    events.clear();

    fs::write(&path, "new 1\n").unwrap();
    session.poll_cycle(&mut events).unwrap();
    session.flush(&mut events);

    assert_eq!(session.history(), [TRUNCATION_MARKER, "new 1"]);
    assert_eq!(session.reader_state(), ReaderState::Monitoring);
    assert_eq!(session.offset(), 6);
    // The unflushed "old 4" batch belonged to the discarded history
    assert_eq!(
        events,
        vec![TailEvent::FullReplace(vec![
            TRUNCATION_MARKER.to_string(),
            "new 1".to_string()
        ])]
    );

    append(&path, "new 2\n");
    session.poll_cycle(&mut events).unwrap();
    session.flush(&mut events);
    assert_eq!(session.history(), [TRUNCATION_MARKER, "new 1", "new 2"]);
}

#[test]
fn initial_load_of_short_lines_keeps_last_thousand() {
    let dir = TempDir::new().unwrap();
    let content: String = (0..1500).map(|i| format!("line {i:04}\n")).collect();
    let path = create(&dir, &content);
    let mut events = Vec::new();

    let session = open(&path, FilterState::disabled(), &mut events);

    let history = session.history();
    assert_eq!(history.len(), 1000);
    assert_eq!(history.first().unwrap(), "line 0500");
    assert_eq!(history.last().unwrap(), "line 1499");
    assert_eq!(session.offset(), content.len() as u64);
}

#[test]
fn initial_load_of_long_lines_drops_the_partial_first_line() {
    let dir = TempDir::new().unwrap();
    // 300 bytes per line: the 200_000 byte estimate starts inside line 833
    let content: String = (0..1500)
        .map(|i| format!("{i:05} {}\n", "x".repeat(293)))
        .collect();
    assert_eq!(content.len(), 450_000);
    let path = create(&dir, &content);
    let mut events = Vec::new();

    let session = open(&path, FilterState::disabled(), &mut events);

    let history = session.history();
    assert_eq!(history.len(), 666);
    assert!(history.first().unwrap().starts_with("00834 "));
    assert!(history.last().unwrap().starts_with("01499 "));
    assert!(history.iter().all(|line| line.len() == 299));
}

#[test]
fn blank_and_padded_live_lines_are_normalised() {
    let dir = TempDir::new().unwrap();
    let path = create(&dir, "");
    let mut events = Vec::new();
    let mut session = open(&path, FilterState::disabled(), &mut events);

    append(&path, "  padded  \r\n\r\n\n\tTabbed\n");
    session.poll_cycle(&mut events).unwrap();

    assert_eq!(session.history(), ["padded", "Tabbed"]);
}

#[test]
fn opening_a_directory_fails() {
    let dir = TempDir::new().unwrap();
    let mut events = Vec::new();

    let result = TailSession::open(
        dir.path(),
        &TailSettings::default(),
        FilterState::disabled(),
        Arc::new(AtomicBool::new(false)),
        &mut events,
    );

    assert!(matches!(result, Err(logview_tail::TailError::NotAFile(_))));
    assert!(events.is_empty());
}
