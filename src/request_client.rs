use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::prelude::*;

const USER_AGENT: &str = concat!("gobench/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by every request of a run.
///
/// The timeout covers the whole request, including reading the response body.
pub fn build_request_client(timeout: Duration, skip_tls_verify: bool) -> Result<Client> {
    if skip_tls_verify {
        warn!("TLS certificate verification is disabled");
    }

    ClientBuilder::new()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .danger_accept_invalid_certs(skip_tls_verify)
        .build()
        .context("Failed to build the HTTP client")
}
