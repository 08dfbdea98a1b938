//! Buildpack descriptors.
//!
//! A descriptor names a buildpack archive and where to fetch it from. Two
//! representations exist: [`Buildpack`] is the native form handed in by the
//! caller, [`StringifiedBuildpack`] is the form written to the staging
//! manifest where `skip_detect` travels as a string.

mod stringified;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{BuildpackError, Result};

pub use stringified::StringifiedBuildpack;

/// A buildpack to install
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buildpack {
    /// Identifying name, also the key for the staging directory
    #[serde(alias = "Name")]
    pub name: String,

    /// Opaque caller identifier, passed through untouched
    #[serde(alias = "Key")]
    pub key: String,

    /// Location of the zip archive
    #[serde(alias = "URL")]
    pub url: String,

    /// Whether the build step should skip detection for this buildpack
    #[serde(default, alias = "SkipDetect", skip_serializing_if = "Option::is_none")]
    pub skip_detect: Option<bool>,
}

impl Buildpack {
    pub fn new(name: impl Into<String>, key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            url: url.into(),
            skip_detect: None,
        }
    }

    pub fn with_skip_detect(mut self, skip_detect: bool) -> Self {
        self.skip_detect = Some(skip_detect);
        self
    }
}

/// Decode the caller supplied buildpack list.
///
/// Only the shape is checked: the list must be valid JSON, every name must be
/// non-empty and names must be unique. URLs are not inspected.
pub fn parse_buildpacks(input: &str) -> Result<Vec<Buildpack>> {
    let buildpacks: Vec<Buildpack> = serde_json::from_str(input)?;

    let mut seen = HashSet::with_capacity(buildpacks.len());
    for (index, buildpack) in buildpacks.iter().enumerate() {
        if buildpack.name.is_empty() {
            return Err(BuildpackError::InvalidManifest {
                message: format!("buildpack at index {} has an empty name", index),
            });
        }
        if !seen.insert(buildpack.name.as_str()) {
            return Err(BuildpackError::InvalidManifest {
                message: format!("buildpack {} is listed more than once", buildpack.name),
            });
        }
    }

    Ok(buildpacks)
}
