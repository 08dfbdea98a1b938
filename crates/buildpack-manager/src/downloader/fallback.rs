//! Primary/fallback fetching of buildpack archives.

use std::sync::Arc;

use crate::buildpack::Buildpack;
use crate::http::HttpFetch;
use crate::{BuildpackError, Result};

/// Fetches archives with a primary client, falling back to a second one.
///
/// Some buildpack URLs are only reachable through one of two client
/// configurations (for instance one honouring a proxy and one not). Which
/// client answered is not reported to the caller.
#[derive(Clone)]
pub struct FallbackFetcher {
    primary: Arc<dyn HttpFetch>,
    fallback: Arc<dyn HttpFetch>,
}

impl FallbackFetcher {
    pub fn new(primary: Arc<dyn HttpFetch>, fallback: Arc<dyn HttpFetch>) -> Self {
        Self { primary, fallback }
    }

    /// Download the archive of a buildpack
    pub async fn fetch(&self, buildpack: &Buildpack) -> Result<Vec<u8>> {
        let primary_err = match self.primary.fetch(&buildpack.url).await {
            Ok(bytes) => {
                log::debug!("Downloaded {} ({} bytes)", buildpack.name, bytes.len());
                return Ok(bytes);
            }
            Err(e) => e,
        };

        log::warn!(
            "Primary client failed to download {} from {}: {}; trying default client",
            buildpack.name, buildpack.url, primary_err
        );

        match self.fallback.fetch(&buildpack.url).await {
            Ok(bytes) => {
                log::debug!("Downloaded {} with default client ({} bytes)", buildpack.name, bytes.len());
                Ok(bytes)
            }
            Err(fallback_err) => Err(BuildpackError::DownloadFailed {
                name: buildpack.name.clone(),
                primary: primary_err.to_string(),
                fallback: fallback_err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every request with a fixed outcome and counts calls
    struct StubClient {
        status: Option<u16>,
        calls: AtomicUsize,
    }

    impl StubClient {
        fn ok() -> Arc<Self> {
            Arc::new(Self { status: None, calls: AtomicUsize::new(0) })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self { status: Some(status), calls: AtomicUsize::new(0) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpFetch for StubClient {
        async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, HttpError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.status {
                None => Ok(url.as_bytes().to_vec()),
                Some(status) => Err(HttpError::HttpStatus { status, url: url.to_string() }),
            }
        }
    }

    fn buildpack() -> Buildpack {
        Buildpack::new("my_buildpack", "my-key", "http://host/my-buildpack")
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let primary = StubClient::ok();
        let fallback = StubClient::ok();
        let fetcher = FallbackFetcher::new(primary.clone(), fallback.clone());

        let bytes = fetcher.fetch(&buildpack()).await.unwrap();

        assert_eq!(bytes, b"http://host/my-buildpack");
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_fallback_used_when_primary_fails() {
        let primary = StubClient::failing(503);
        let fallback = StubClient::ok();
        let fetcher = FallbackFetcher::new(primary.clone(), fallback.clone());

        let bytes = fetcher.fetch(&buildpack()).await.unwrap();

        assert_eq!(bytes, b"http://host/my-buildpack");
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn test_both_clients_failing() {
        let primary = StubClient::failing(500);
        let fallback = StubClient::failing(404);
        let fetcher = FallbackFetcher::new(primary.clone(), fallback.clone());

        let err = fetcher.fetch(&buildpack()).await.unwrap_err();
        let message = err.to_string();

        assert!(message.contains("my_buildpack"));
        assert!(message.contains("HTTP 500"));
        assert!(message.contains("default client also failed"));
        assert!(message.contains("HTTP 404"));
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }
}
