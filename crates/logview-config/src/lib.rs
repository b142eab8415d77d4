//! Configuration and file management for logview
//!
//! This crate provides:
//! - Config and cache directory paths
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)
//! - Discovery of log files in a directory

pub mod app_config;
pub mod config_file;
pub mod log_directory;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::load_config_file;
pub use log_directory::{LogFileEntry, is_log_file_name, list_log_files, newest_log_file};
