pub mod buildpack;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod installer;
pub mod util;

pub use buildpack::{parse_buildpacks, Buildpack, StringifiedBuildpack};
pub use config::{BuildpackSource, ConfigLoader, InstallerConfig};
pub use downloader::{ArchiveExtractor, FallbackFetcher};
pub use error::{BuildpackError, Result};
pub use http::{HttpClient, HttpClientConfig, HttpError, HttpFetch};
pub use installer::{BuildpackManager, StagedBuildpack, read_manifest, write_manifest, MANIFEST_FILE};
pub use util::{buildpack_dir, buildpack_dir_name};
