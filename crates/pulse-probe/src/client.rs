//! HTTP availability prober

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::ProbeError;
use crate::outcome::ProbeOutcome;

/// Prober configuration
#[derive(Clone, Debug)]
pub struct ProbeConfig {
    /// Bound on establishing the TCP/TLS connection
    pub connect_timeout: Duration,
    /// Bound on waiting for response bytes
    pub read_timeout: Duration,
    /// Honour HTTP(S)_PROXY from the environment
    pub use_system_proxy: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(5),
            use_system_proxy: true,
        }
    }
}

/// Something that can check whether a URL answers
///
/// Implementations never fail: an unreachable target is an unavailable
/// [`ProbeOutcome`].
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// reqwest-backed prober issuing a single GET per check
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Create a new prober
    pub fn new(config: ProbeConfig) -> Result<Self, ProbeError> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            // Hard ceiling so a trickling server cannot hold a probe open
            .timeout(config.connect_timeout + config.read_timeout)
            .user_agent(concat!("pulse/", env!("CARGO_PKG_VERSION")));

        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build()?;

        info!(
            "Created HTTP prober (connect timeout: {:?}, read timeout: {:?})",
            config.connect_timeout, config.read_timeout
        );

        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let started = Instant::now();

        // The body is never read; dropping the response releases the connection.
        let outcome = match self.client.get(url).send().await {
            Ok(response) => ProbeOutcome::from_status(response.status().as_u16()),
            Err(e) => {
                warn!("Availability check failed for {}: {}", url, e);
                ProbeOutcome::unreachable(&e)
            }
        };

        debug!(
            "Probed {} in {:?}: available={} ({})",
            url,
            started.elapsed(),
            outcome.available,
            outcome.message
        );

        outcome
    }
}
