//! Zip extraction for buildpack archives.

use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::{BuildpackError, Result};

/// Archive extractor
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Extract an in-memory zip archive into `dest_dir`.
    ///
    /// Entry paths are recreated as-is below `dest_dir`; nothing is stripped.
    /// Any entry resolving outside `dest_dir` fails the whole extraction.
    /// `name` labels the errors.
    pub fn extract_zip_bytes(name: &str, bytes: &[u8], dest_dir: &Path) -> Result<()> {
        let fail = |reason: String| BuildpackError::Extraction {
            name: name.to_string(),
            reason,
        };

        std::fs::create_dir_all(dest_dir)
            .map_err(|e| fail(format!("Failed to create {}: {}", dest_dir.display(), e)))?;

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| fail(format!("Failed to open zip: {}", e)))?;

        // Canonicalize dest_dir for path traversal check
        let dest_dir_canonical = dest_dir
            .canonicalize()
            .map_err(|e| fail(format!("Failed to canonicalize destination: {}", e)))?;

        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| fail(format!("Failed to read zip entry: {}", e)))?;

            let relative_path = match file.enclosed_name() {
                Some(path) => path,
                None => {
                    return Err(fail(format!(
                        "Path traversal detected in archive: {}",
                        file.name()
                    )))
                }
            };

            if relative_path.as_os_str().is_empty() {
                continue;
            }

            let outpath = dest_dir.join(&relative_path);
            let escapes = || {
                fail(format!(
                    "Path traversal detected: {} escapes destination directory",
                    relative_path.display()
                ))
            };

            // Directories still to be created must not hang off a symlink leading outside
            let dir_to_create = if file.is_dir() { Some(outpath.as_path()) } else { outpath.parent() };
            if let Some(dir) = dir_to_create {
                if !Self::existing_ancestor_canonical(dir).starts_with(&dest_dir_canonical) {
                    return Err(escapes());
                }
                std::fs::create_dir_all(dir)
                    .map_err(|e| fail(format!("Failed to create {}: {}", dir.display(), e)))?;
            }

            if !Self::canonical_target(&outpath).starts_with(&dest_dir_canonical) {
                return Err(escapes());
            }

            if file.is_dir() {
                continue;
            }

            // A previous run may have left a read-only file here
            if let Ok(metadata) = std::fs::symlink_metadata(&outpath) {
                if !metadata.is_dir() {
                    std::fs::remove_file(&outpath)
                        .map_err(|e| fail(format!("Failed to replace {}: {}", outpath.display(), e)))?;
                }
            }

            let mut outfile = File::create(&outpath)
                .map_err(|e| fail(format!("Failed to create {}: {}", outpath.display(), e)))?;
            std::io::copy(&mut file, &mut outfile)
                .map_err(|e| fail(format!("Failed to write {}: {}", outpath.display(), e)))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = file.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
                        .map_err(|e| fail(format!("Failed to set permissions on {}: {}", outpath.display(), e)))?;
                }
            }
        }

        Ok(())
    }

    /// Canonical form of the deepest part of `path` that already exists
    fn existing_ancestor_canonical(path: &Path) -> PathBuf {
        let mut current = Some(path);
        while let Some(candidate) = current {
            if let Ok(canonical) = candidate.canonicalize() {
                return canonical;
            }
            current = candidate.parent();
        }
        path.to_path_buf()
    }

    /// Canonical form of a path whose final component may not exist yet
    fn canonical_target(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if let (Some(parent), Some(filename)) = (path.parent(), path.file_name()) {
                if let Ok(parent_canonical) = parent.canonicalize() {
                    return parent_canonical.join(filename);
                }
            }
            path.to_path_buf()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(content).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_preserves_relative_paths() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("staged");
        let bytes = build_zip(&[
            ("manifest.yml", b"language: ruby"),
            ("bin/", b""),
            ("bin/detect", b"#!/bin/sh\nexit 0"),
        ]);

        ArchiveExtractor::extract_zip_bytes("ruby_buildpack", &bytes, &dest).unwrap();

        assert_eq!(std::fs::read(dest.join("manifest.yml")).unwrap(), b"language: ruby");
        assert!(dest.join("bin").is_dir());
        assert_eq!(std::fs::read(dest.join("bin/detect")).unwrap(), b"#!/bin/sh\nexit 0");
    }

    #[test]
    fn test_extract_into_existing_directory_overwrites() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("staged");
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("VERSION"), b"old").unwrap();

        let bytes = build_zip(&[("VERSION", b"new")]);
        ArchiveExtractor::extract_zip_bytes("bp", &bytes, &dest).unwrap();

        assert_eq!(std::fs::read(dest.join("VERSION")).unwrap(), b"new");
    }

    #[test]
    fn test_extract_rejects_parent_traversal() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("staged");
        let bytes = build_zip(&[("../evil.sh", b"rm -rf /")]);

        let err = ArchiveExtractor::extract_zip_bytes("evil_buildpack", &bytes, &dest).unwrap_err();

        assert!(matches!(err, BuildpackError::Extraction { ref name, .. } if name == "evil_buildpack"));
        assert!(err.to_string().contains("Path traversal"));
        assert!(!temp.path().join("evil.sh").exists());
    }

    #[test]
    fn test_extract_rejects_absolute_paths() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("staged");
        let bytes = build_zip(&[("/abs/path", b"boom")]);

        let err = ArchiveExtractor::extract_zip_bytes("bp", &bytes, &dest).unwrap_err();

        assert!(err.to_string().contains("Path traversal"));
        assert!(!dest.join("abs").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_rejects_symlinked_directory() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("staged");
        let outside = temp.path().join("outside");
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::create_dir_all(&outside).unwrap();
        std::os::unix::fs::symlink(&outside, dest.join("link")).unwrap();

        let bytes = build_zip(&[("link/sub/evil.sh", b"boom")]);
        let err = ArchiveExtractor::extract_zip_bytes("bp", &bytes, &dest).unwrap_err();

        assert!(err.to_string().contains("escapes destination directory"));
        assert!(!outside.join("sub").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_twice_over_read_only_file() {
        fn read_only_zip(content: &[u8]) -> Vec<u8> {
            let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
            writer
                .start_file("VERSION", SimpleFileOptions::default().unix_permissions(0o444))
                .unwrap();
            writer.write_all(content).unwrap();
            writer.finish().unwrap().into_inner()
        }

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("staged");

        ArchiveExtractor::extract_zip_bytes("bp", &read_only_zip(b"1.0"), &dest).unwrap();
        ArchiveExtractor::extract_zip_bytes("bp", &read_only_zip(b"2.0"), &dest).unwrap();

        assert_eq!(std::fs::read(dest.join("VERSION")).unwrap(), b"2.0");
    }

    #[test]
    fn test_extract_malformed_archive() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("staged");

        let err = ArchiveExtractor::extract_zip_bytes("broken", b"definitely not a zip", &dest).unwrap_err();

        assert!(matches!(err, BuildpackError::Extraction { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_restores_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("bin/compile", SimpleFileOptions::default().unix_permissions(0o755))
            .unwrap();
        writer.write_all(b"#!/bin/sh").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("staged");
        ArchiveExtractor::extract_zip_bytes("bp", &bytes, &dest).unwrap();

        let mode = std::fs::metadata(dest.join("bin/compile")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
