//! Buildpack installation.
//!
//! This module fetches and stages every requested buildpack and writes the
//! `config.json` manifest the build step reads afterwards.

mod manager;
mod manifest;

pub use manager::{BuildpackManager, StagedBuildpack};
pub use manifest::{read_manifest, write_manifest, MANIFEST_FILE};
