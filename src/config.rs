use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::constants::constants;

const QUALIFIER: &str = "";
const ORGANIZATION: &str = "";
const APPLICATION: &str = "vidamrr";

/// User preferences stored as `config.toml` in the platform config directory.
#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct Config {
  pub data_file: Option<PathBuf>,
  pub fetch_timeout_secs: Option<u64>,
}

impl Config {
  pub fn load() -> Self {
    match project_dirs() {
      Some(dirs) => Self::load_from(&dirs.config_dir().join("config.toml")),
      None => Self::default(),
    }
  }

  /// Missing or malformed files fall back to defaults; only the log knows.
  pub fn load_from(path: &Path) -> Self {
    let content = match std::fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) => {
        debug!(path = %path.display(), err = %e, "config: no user config, using defaults");
        return Self::default();
      }
    };
    match toml::from_str(&content) {
      Ok(config) => config,
      Err(e) => {
        warn!(path = %path.display(), err = %e, "config: malformed user config, using defaults");
        Self::default()
      }
    }
  }
}

/// Effective runtime settings after layering CLI flags over the config file over constants.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
  pub data_file: PathBuf,
  pub fetch_timeout: Duration,
}

impl Settings {
  pub fn resolve(cli_data_file: Option<PathBuf>, cli_timeout_secs: Option<u64>, config: Config) -> Self {
    let c = constants();
    let data_file = cli_data_file.or(config.data_file).unwrap_or_else(|| PathBuf::from(&c.data_file_name));
    let secs = cli_timeout_secs.or(config.fetch_timeout_secs).unwrap_or(c.fetch_timeout_secs).max(1);
    Self { data_file, fetch_timeout: Duration::from_secs(secs) }
  }
}

pub fn project_dirs() -> Option<ProjectDirs> {
  ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Directory for the log file. Falls back to the system temp dir when no home is known.
pub fn log_dir() -> PathBuf {
  project_dirs().map(|d| d.data_local_dir().to_path_buf()).unwrap_or_else(|| std::env::temp_dir().join(APPLICATION))
}
