//! Long-lived HTTP clients for provider traffic.
//!
//! Every provider wrapper owns exactly one `reqwest::Client`, built here when the wrapper
//! is constructed at startup and dropped together with it. Reusing the client keeps
//! connections alive across requests instead of paying DNS and TLS setup on every turn.
//!
//! The client is configured with:
//! - Connection pooling with up to 10 idle connections per host
//! - 90-second idle timeout for persistent connections
//! - TCP keepalive to maintain long-lived connections
//! - A whole-request timeout, so a hung provider fails instead of blocking a debate

use reqwest;
use std::time::Duration;

/// Default bound on a single provider call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the pooled client a provider wrapper keeps for its whole lifetime.
///
/// Falls back to an unconfigured client if the TLS backend refuses the builder; the
/// wrappers also set the timeout per request, so the bound still applies.
pub fn build_http_client(timeout: Duration) -> reqwest::Client {
    match create_pooled_client(timeout) {
        Ok(client) => client,
        Err(err) => {
            log::error!(
                "duologue::http_client_pool::build_http_client(...): falling back to default client: {}",
                err
            );
            reqwest::Client::new()
        }
    }
}

fn create_pooled_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::ClientBuilder::new()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
}
