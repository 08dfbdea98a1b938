//! HTTP transport used to fetch buildpack archives.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpError, HttpFetch};
