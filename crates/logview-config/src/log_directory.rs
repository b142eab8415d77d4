//! Log directory discovery
//!
//! Lists the readable log files of a directory, newest first. A file counts as
//! a log when its extension is one of [`LOG_EXTENSIONS`] or it has none.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const LOG_EXTENSIONS: [&str; 5] = ["log", "txt", "out", "err", "trace"];

/// A log file found in the log directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileEntry {
    pub name: String,
    pub path: PathBuf,
    /// Last modification time, None when the platform could not report it
    pub modified: Option<DateTime<Local>>,
}

impl LogFileEntry {
    /// Case-insensitive substring match on the file name, used by the file list filter
    pub fn matches_name(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Whether `name` looks like a log file name
pub fn is_log_file_name(name: &str) -> bool {
    match name.rsplit_once('.') {
        None => true,
        Some((_, extension)) => LOG_EXTENSIONS
            .iter()
            .any(|known| extension.eq_ignore_ascii_case(known)),
    }
}

/// List the readable log files in `dir`, most recently modified first
pub fn list_log_files(dir: &Path) -> Result<Vec<LogFileEntry>> {
    if !dir.is_dir() {
        bail!("Log path '{}' is not a directory", dir.display());
    }

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list log files in {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry of {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        if !path.is_file() || !is_log_file_name(&name) {
            continue;
        }
        if let Err(e) = File::open(&path) {
            log::debug!("Skipping unreadable log file {}: {}", path.display(), e);
            continue;
        }

        let modified = match entry.metadata().and_then(|meta| meta.modified()) {
            Ok(time) => Some(DateTime::<Local>::from(time)),
            Err(e) => {
                log::warn!("Could not read modification time of '{}': {}", name, e);
                None
            }
        };
        files.push(LogFileEntry {
            name,
            path,
            modified,
        });
    }

    // None sorts before Some, so unknown times end up last
    files.sort_by(|a, b| b.modified.cmp(&a.modified));
    log::info!("Found {} log files in {}", files.len(), dir.display());
    Ok(files)
}

/// Most recently modified log file in `dir`
pub fn newest_log_file(dir: &Path) -> Result<Option<PathBuf>> {
    Ok(list_log_files(dir)?.into_iter().next().map(|entry| entry.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[test]
    fn test_is_log_file_name() {
        assert!(is_log_file_name("service.log"));
        assert!(is_log_file_name("SERVICE.LOG"));
        assert!(is_log_file_name("stderr.err"));
        assert!(is_log_file_name("app.trace"));
        assert!(is_log_file_name("README"));
        assert!(!is_log_file_name("service.log.1"));
        assert!(!is_log_file_name("config.toml"));
    }

    fn touch(dir: &TempDir, name: &str, age_secs: u64) {
        let path = dir.path().join(name);
        fs::write(&path, "x\n").unwrap();
        let file = File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
    }

    #[test]
    fn test_list_log_files_newest_first() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "old.log", 300);
        touch(&dir, "new.txt", 10);
        touch(&dir, "middle", 100);
        touch(&dir, "settings.json", 0);
        fs::create_dir(dir.path().join("archive.log")).unwrap();

        let files = list_log_files(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["new.txt", "middle", "old.log"]);
        assert!(files.iter().all(|f| f.modified.is_some()));

        assert_eq!(
            newest_log_file(dir.path()).unwrap(),
            Some(dir.path().join("new.txt"))
        );
    }

    #[test]
    fn test_list_log_files_rejects_non_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("service.log");
        fs::write(&file, "").unwrap();
        assert!(list_log_files(&file).is_err());
        assert!(list_log_files(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(list_log_files(dir.path()).unwrap().is_empty());
        assert_eq!(newest_log_file(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_matches_name() {
        let entry = LogFileEntry {
            name: "Batman.log".to_string(),
            path: PathBuf::from("Batman.log"),
            modified: None,
        };
        assert!(entry.matches_name("batman"));
        assert!(entry.matches_name(""));
        assert!(!entry.matches_name("robin"));
    }
}
