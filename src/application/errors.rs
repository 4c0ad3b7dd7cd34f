//! Application layer errors

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Top-level errors surfaced by CLI commands
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    #[error("{failed} of {total} plugins failed")]
    Failures { failed: usize, total: usize },
}

/// Reading, parsing and writing YAML files and settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Manifest mutations
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Plugin {0} already exists in the manifest")]
    DuplicatePlugin(String),

    #[error("Plugin {0} is not in the manifest")]
    NotInManifest(String),

    #[error("Manifest already exists: {}", .0.display())]
    AlreadyInitialized(PathBuf),
}

/// Downloading an archive over HTTP
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error downloading from {url}. Status code: {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to write download: {0}")]
    Write(#[source] std::io::Error),
}

/// Unpacking a zip archive
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to open archive {}: {source}", path.display())]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Corrupt archive entry: {0}")]
    Archive(#[source] zip::result::ZipError),

    #[error("Archive entry escapes the destination directory: {entry}")]
    PathEscape { entry: String },

    #[error("Filesystem error on {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One plugin's install or uninstall unit
#[derive(Error, Debug)]
pub enum TaskError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Failed to create temporary file: {0}")]
    TempFile(#[source] std::io::Error),

    #[error("Cancelled")]
    Cancelled,

    #[error("Timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Worker failed: {0}")]
    Worker(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
