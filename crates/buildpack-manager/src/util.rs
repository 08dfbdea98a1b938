//! Utility functions for buildpack staging.

use std::path::{Path, PathBuf};

use md5::{Digest, Md5};

/// Name of the staging directory for a buildpack.
///
/// The directory is keyed on the buildpack name only: the lowercase hex MD5
/// digest of its UTF-8 bytes. Consumers of the staged layout locate
/// buildpacks by recomputing this digest.
///
/// # Examples
///
/// ```
/// use buildpack_manager::util::buildpack_dir_name;
///
/// assert_eq!(buildpack_dir_name("hello world"), "5eb63bbbe01eeed093cb22bb8f5acdc3");
/// assert_eq!(buildpack_dir_name("my_buildpack").len(), 32);
/// ```
pub fn buildpack_dir_name(name: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Staging directory of a buildpack below the install root
pub fn buildpack_dir(root: &Path, name: &str) -> PathBuf {
    root.join(buildpack_dir_name(name))
}
