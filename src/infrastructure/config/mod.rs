//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use crate::application::errors::{ConfigError, ConfigResult};

/// Project-local manifest file name
pub const MANIFEST_FILE_NAME: &str = "cs2pm.yaml";

/// Registry checkout directory under the user's home
pub const DEFAULT_REGISTRY_DIR: &str = ".cs2pm";

pub const ENV_REGISTRY_PATH: &str = "CS2PM_REGISTRY_PATH";
pub const ENV_MANIFEST: &str = "CS2PM_MANIFEST";
pub const ENV_JOBS: &str = "CS2PM_JOBS";
pub const ENV_DOWNLOAD_TIMEOUT: &str = "CS2PM_DOWNLOAD_TIMEOUT";

/// Runtime settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    pub registry_path: PathBuf,
    pub manifest_path: PathBuf,
    /// Maximum plugins processed at once
    pub concurrency: usize,
    pub download_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry_path: default_registry_path(),
            manifest_path: PathBuf::from(MANIFEST_FILE_NAME),
            concurrency: 4,
            download_timeout_secs: 300,
            connect_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Defaults overlaid with environment variables
    pub fn load_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `load_env` but reads variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut settings = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = var(ENV_REGISTRY_PATH) {
            settings.registry_path = clean_path(Path::new(&path));
        }

        if let Some(path) = var(ENV_MANIFEST) {
            settings.manifest_path = PathBuf::from(path);
        }

        if let Some(jobs) = var(ENV_JOBS) {
            settings.concurrency = parse_number(ENV_JOBS, &jobs)?;
        }

        if let Some(secs) = var(ENV_DOWNLOAD_TIMEOUT) {
            settings.download_timeout_secs = parse_number(ENV_DOWNLOAD_TIMEOUT, &secs)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue("concurrency must be at least 1".to_string()));
        }
        if self.download_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("download timeout must be at least 1 second".to_string()));
        }
        Ok(())
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_registry_path() -> PathBuf {
    // Fall back to a relative checkout when no home directory is known
    dirs::home_dir()
        .unwrap_or_default()
        .join(DEFAULT_REGISTRY_DIR)
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("{}={} is not a number", key, value)))
}

/// Lexically normalize a path: drop `.` and resolve `..` against earlier
/// components without touching the filesystem.
pub fn clean_path(path: &Path) -> PathBuf {
    let out = normalize(path);
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Join `relative` under `root` and return it only if the result stays
/// strictly inside `root`.
pub fn join_within(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    if relative.has_root() || relative.is_absolute() {
        return None;
    }
    let relative = normalize(relative);
    match relative.components().next() {
        None | Some(Component::ParentDir) => None,
        Some(_) => Some(root.join(relative)),
    }
}
