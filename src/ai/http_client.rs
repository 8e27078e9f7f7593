//! Shared HTTP client with connection pooling.
//!
//! One lazily-initialized client serves every completion call, so TLS
//! sessions and TCP connections are reused across upload cycles. The client
//! carries pooling configuration only; credentials, URLs, and model choices
//! live in [`AnalyzerConfig`](crate::AnalyzerConfig).

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

static COMPLETION_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .pool_max_idle_per_host(8)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .build()
        .expect("Failed to create completion HTTP client")
});

/// Get the shared completion HTTP client.
#[inline]
pub(crate) fn completion_client() -> &'static Client {
    &COMPLETION_CLIENT
}
