//! Buildpack downloading and extraction.
//!
//! Archives are fetched with a primary client and, when that fails, once more
//! with a fallback client. The body is then unpacked in memory into the
//! buildpack's staging directory.

mod archive;
mod fallback;

pub use archive::ArchiveExtractor;
pub use fallback::FallbackFetcher;
