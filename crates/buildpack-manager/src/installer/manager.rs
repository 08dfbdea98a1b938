//! Buildpack manager - stages buildpacks into the install root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::buildpack::{parse_buildpacks, Buildpack};
use crate::downloader::{ArchiveExtractor, FallbackFetcher};
use crate::http::HttpFetch;
use crate::util::buildpack_dir;
use crate::{BuildpackError, Result};

use super::manifest::write_manifest;

/// A buildpack together with the directory it was extracted into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedBuildpack {
    pub buildpack: Buildpack,
    pub path: PathBuf,
}

/// Installs a list of buildpacks into a directory.
///
/// Every buildpack ends up in `<buildpacks_dir>/<md5(name)>` and the full list
/// is recorded in `<buildpacks_dir>/config.json`.
pub struct BuildpackManager {
    fetcher: FallbackFetcher,
    buildpacks_dir: PathBuf,
    buildpacks_json: String,
}

impl BuildpackManager {
    /// Create a new buildpack manager.
    ///
    /// `primary` is tried first for every download, `fallback` only when the
    /// primary attempt fails. `buildpacks_json` is the serialized list of
    /// buildpacks; it is decoded when [`install`](Self::install) runs.
    pub fn new(
        primary: Arc<dyn HttpFetch>,
        fallback: Arc<dyn HttpFetch>,
        buildpacks_dir: impl Into<PathBuf>,
        buildpacks_json: impl Into<String>,
    ) -> Self {
        Self {
            fetcher: FallbackFetcher::new(primary, fallback),
            buildpacks_dir: buildpacks_dir.into(),
            buildpacks_json: buildpacks_json.into(),
        }
    }

    /// Get the install root
    pub fn buildpacks_dir(&self) -> &Path {
        &self.buildpacks_dir
    }

    /// Download and stage all buildpacks, then write the manifest.
    ///
    /// Buildpacks are staged concurrently and all of them run to completion.
    /// If any failed, the error of the first failing buildpack in list order
    /// is returned and no manifest is written; directories staged by the
    /// others stay on disk.
    pub async fn install(&self) -> Result<Vec<StagedBuildpack>> {
        let buildpacks = parse_buildpacks(&self.buildpacks_json)?;

        log::debug!(
            "Installing {} buildpacks into {}",
            buildpacks.len(),
            self.buildpacks_dir.display()
        );
        tokio::fs::create_dir_all(&self.buildpacks_dir)
            .await
            .map_err(|source| BuildpackError::InstallRoot {
                path: self.buildpacks_dir.clone(),
                source,
            })?;

        let mut tasks = Vec::with_capacity(buildpacks.len());
        for buildpack in buildpacks.iter().cloned() {
            let fetcher = self.fetcher.clone();
            let path = buildpack_dir(&self.buildpacks_dir, &buildpack.name);
            let name = buildpack.name.clone();
            let handle = tokio::spawn(async move {
                stage(&fetcher, &buildpack, &path).await?;
                Ok::<_, BuildpackError>(StagedBuildpack { buildpack, path })
            });
            tasks.push((name, handle));
        }

        // Wait for every task before deciding the outcome
        let mut results = Vec::with_capacity(tasks.len());
        for (name, handle) in tasks {
            let result = handle.await.unwrap_or_else(|e| {
                Err(BuildpackError::Task {
                    name,
                    reason: e.to_string(),
                })
            });
            results.push(result);
        }

        let staged = results.into_iter().collect::<Result<Vec<_>>>()?;

        write_manifest(&self.buildpacks_dir, &buildpacks)?;
        Ok(staged)
    }
}

/// Fetch one buildpack and extract it into `dest`
async fn stage(fetcher: &FallbackFetcher, buildpack: &Buildpack, dest: &Path) -> Result<()> {
    log::debug!("Downloading {} from {}", buildpack.name, buildpack.url);
    let bytes = fetcher.fetch(buildpack).await?;

    log::debug!("Extracting {} into {}", buildpack.name, dest.display());
    let name = buildpack.name.clone();
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || ArchiveExtractor::extract_zip_bytes(&name, &bytes, &dest))
        .await
        .map_err(|e| BuildpackError::Task {
            name: buildpack.name.clone(),
            reason: e.to_string(),
        })?
}
