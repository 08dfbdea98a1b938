use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildpackError {
    // Input errors
    #[error("Failed to decode buildpacks: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid buildpack list: {message}")]
    InvalidManifest { message: String },

    // Download errors
    #[error("Failed to download buildpack {name}: {primary}; default client also failed: {fallback}")]
    DownloadFailed {
        name: String,
        primary: String,
        fallback: String,
    },

    // Staging errors
    #[error("Failed to extract buildpack {name}: {reason}")]
    Extraction { name: String, reason: String },

    #[error("Failed to create install root {}: {source}", .path.display())]
    InstallRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode manifest {}: {source}", .path.display())]
    ManifestEncode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Worker errors
    #[error("Staging task for {name} did not complete: {reason}")]
    Task { name: String, reason: String },
}

impl BuildpackError {
    /// Name of the buildpack the error belongs to, if any
    pub fn buildpack_name(&self) -> Option<&str> {
        match self {
            BuildpackError::DownloadFailed { name, .. }
            | BuildpackError::Extraction { name, .. }
            | BuildpackError::Task { name, .. } => Some(name),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildpackError>;
