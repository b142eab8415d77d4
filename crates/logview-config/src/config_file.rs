use std::{env, path::PathBuf};

const CONFIG_FILE: &str = ".logview.toml";

/// Load config file content from CWD first, then home directory
///
/// Searches for the config in:
/// 1. `.logview.toml` in the current working directory
/// 2. `.logview.toml` in the home directory
/// 3. `config.toml` in the application config directory
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    candidate_paths()
        .into_iter()
        .find_map(|path| match std::fs::read_to_string(&path) {
            Ok(content) => {
                log::debug!("Loaded config from {}", path.display());
                Some(content)
            }
            Err(_) => None,
        })
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(CONFIG_FILE));
    }
    if let Ok(global) = crate::paths::app_config_path() {
        paths.push(global);
    }
    paths
}
