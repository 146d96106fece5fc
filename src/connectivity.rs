//! Blocking wait for network reachability between transfer attempts.

use std::time::{Duration, Instant};

use reqwest::Client;
use tokio_util::sync::CancellationToken;

/// Host probed to decide whether the network is back.
pub const DEFAULT_PROBE_URL: &str = "https://www.google.com";

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[async_trait::async_trait]
pub trait Connectivity: Send + Sync {
    /// Return once the network is reachable (or waiting has been given up).
    async fn wait_for_connection(&self);
}

/// Polls a well-known host on a fixed interval until any HTTP response
/// comes back.
pub struct ProbeConnectivity {
    client: Client,
    probe_url: String,
    interval: Duration,
    /// `None` waits without bound.
    max_wait: Option<Duration>,
    shutdown: CancellationToken,
}

impl ProbeConnectivity {
    pub fn new(
        client: Client,
        interval: Duration,
        max_wait: Option<Duration>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            client,
            probe_url: DEFAULT_PROBE_URL.to_string(),
            interval,
            max_wait,
            shutdown,
        }
    }

    #[cfg(test)]
    pub fn with_probe_url(mut self, url: impl Into<String>) -> Self {
        self.probe_url = url.into();
        self
    }

    /// Any response, whatever its status, counts as connected.
    pub async fn is_connected(&self) -> bool {
        match self
            .client
            .get(&self.probe_url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Connectivity probe failed: {}", e);
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl Connectivity for ProbeConnectivity {
    async fn wait_for_connection(&self) {
        let started = Instant::now();
        loop {
            if self.shutdown.is_cancelled() || self.is_connected().await {
                return;
            }
            if let Some(max_wait) = self.max_wait {
                if started.elapsed() >= max_wait {
                    tracing::warn!(
                        "No connectivity after {}s, retrying anyway",
                        started.elapsed().as_secs()
                    );
                    return;
                }
            }
            tracing::warn!("Waiting for internet connection...");
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.cancelled() => return,
            }
        }
    }
}
