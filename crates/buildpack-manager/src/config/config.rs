use std::path::PathBuf;
use std::time::Duration;

use super::source::ConfigLoader;
use crate::http::HttpClientConfig;
use crate::{BuildpackError, Result};

/// Where the serialized buildpack list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildpackSource {
    /// JSON passed inline
    Inline(String),
    /// JSON stored in a file
    File(PathBuf),
}

/// Settings for one staging run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallerConfig {
    /// Install root receiving the staged directories and `config.json`
    pub buildpacks_dir: Option<PathBuf>,
    pub source: Option<BuildpackSource>,
    /// CA bundle trusted by the primary client
    pub ca_file: Option<PathBuf>,
    /// Proxy used by the primary client
    pub proxy: Option<String>,
    pub timeout: Option<Duration>,
}

impl InstallerConfig {
    /// Build configuration from `BUILDPACKS_*` environment variables.
    ///
    /// An inline `BUILDPACKS_JSON` wins over `BUILDPACKS_FILE`.
    pub fn from_env(loader: &ConfigLoader) -> Self {
        let source = loader
            .get_env_config("json")
            .map(BuildpackSource::Inline)
            .or_else(|| loader.get_env_path("file").map(BuildpackSource::File));

        Self {
            buildpacks_dir: loader.get_env_path("dir"),
            source,
            ca_file: loader.get_env_path("ca-file"),
            proxy: loader.get_env_config("proxy"),
            timeout: loader.get_env_u64("timeout").map(Duration::from_secs),
        }
    }

    /// Get the install root
    pub fn buildpacks_dir(&self) -> Result<PathBuf> {
        self.buildpacks_dir
            .clone()
            .ok_or_else(|| BuildpackError::Config("no buildpacks directory configured (BUILDPACKS_DIR)".to_string()))
    }

    /// Load the serialized buildpack list
    pub fn buildpacks_json(&self) -> Result<String> {
        match &self.source {
            Some(BuildpackSource::Inline(json)) => Ok(json.clone()),
            Some(BuildpackSource::File(path)) => std::fs::read_to_string(path)
                .map_err(|e| BuildpackError::Config(format!("Failed to read {}: {}", path.display(), e))),
            None => Err(BuildpackError::Config(
                "no buildpack list configured (BUILDPACKS_JSON or BUILDPACKS_FILE)".to_string(),
            )),
        }
    }

    /// Client tried first: trusts the configured CA and uses the proxy
    pub fn primary_http_config(&self) -> HttpClientConfig {
        let mut config = HttpClientConfig::new();
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(ca_file) = &self.ca_file {
            config = config.with_cafile(ca_file.clone());
        }
        if let Some(proxy) = &self.proxy {
            config = config.with_proxy(proxy.clone());
        }
        config
    }

    /// Client tried when the primary fails: system roots, no proxy
    pub fn fallback_http_config(&self) -> HttpClientConfig {
        let config = HttpClientConfig::new().without_proxy();
        match self.timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}
