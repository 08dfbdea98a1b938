//! The `config.json` staging manifest.

use std::path::{Path, PathBuf};

use crate::buildpack::{Buildpack, StringifiedBuildpack};
use crate::{BuildpackError, Result};

/// File name of the manifest at the install root
pub const MANIFEST_FILE: &str = "config.json";

/// Write the manifest for `buildpacks` to `<root>/config.json`.
///
/// Entries keep the order of `buildpacks`. The file is written in place, an
/// existing manifest is replaced.
pub fn write_manifest(root: &Path, buildpacks: &[Buildpack]) -> Result<PathBuf> {
    let path = root.join(MANIFEST_FILE);
    let entries: Vec<StringifiedBuildpack> = buildpacks.iter().map(StringifiedBuildpack::from).collect();
    let contents = serde_json::to_vec(&entries).map_err(|source| BuildpackError::ManifestEncode {
        path: path.clone(),
        source,
    })?;

    std::fs::write(&path, contents).map_err(|source| BuildpackError::ManifestWrite {
        path: path.clone(),
        source,
    })?;

    log::info!("Wrote {} buildpacks to {}", entries.len(), path.display());
    Ok(path)
}

/// Read `<root>/config.json` back into native descriptors
pub fn read_manifest(root: &Path) -> Result<Vec<Buildpack>> {
    let contents = std::fs::read_to_string(root.join(MANIFEST_FILE))?;
    let entries: Vec<StringifiedBuildpack> = serde_json::from_str(&contents)?;

    entries.into_iter().map(Buildpack::try_from).collect()
}
