//! Load receiver config from file and environment.

use serde::Deserialize;
use std::path::PathBuf;

/// Receiver configuration. File: ~/.config/airlift/config.toml or
/// /etc/airlift/config.toml. Env override: AIRLIFT_DOWNLOAD_DIR.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory received files are written into (default ~/Downloads).
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

fn default_download_dir() -> PathBuf {
    match std::env::var_os("HOME").map(PathBuf::from) {
        Some(home) => home.join("Downloads"),
        None => PathBuf::from("."),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
        }
    }
}

/// Load config: default, then config file (if present), then env vars.
pub fn load() -> Config {
    let mut c = load_file().unwrap_or_else(Config::default);
    if let Some(dir) = std::env::var_os("AIRLIFT_DOWNLOAD_DIR") {
        c.download_dir = PathBuf::from(dir);
    }
    c
}

fn config_paths() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut out = Vec::new();
    if let Some(h) = home {
        out.push(h.join(".config/airlift/config.toml"));
    }
    out.push(PathBuf::from("/etc/airlift/config.toml"));
    out
}

fn load_file() -> Option<Config> {
    for p in config_paths() {
        if p.exists() {
            if let Ok(s) = std::fs::read_to_string(&p) {
                if let Ok(c) = toml::from_str::<Config>(&s) {
                    return Some(c);
                }
            }
            break;
        }
    }
    None
}
