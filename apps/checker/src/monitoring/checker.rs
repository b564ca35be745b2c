use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::error;

use super::types::ProbeOutcome;
use crate::models::{ServiceConfig, ServiceKind};

const USER_AGENT: &str = "Vigil Uptime Monitor/1.0";

/// Probe dispatch seam. The engine only sees this trait, so tests can script
/// outcomes without touching the network.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    /// Probe one service with its configured timeout. Always resolves; a
    /// probe failure is an outcome, not an error.
    async fn probe(&self, config: &ServiceConfig) -> ProbeOutcome;
}

/// TCP reachability checker: a raw connect, closed immediately on success
/// without sending any data.
pub struct TcpChecker;

impl TcpChecker {
    pub async fn check(&self, host: &str, port: u16, timeout_duration: Duration) -> ProbeOutcome {
        let start = Instant::now();

        match timeout(timeout_duration, TcpStream::connect((host, port))).await {
            Ok(Ok(stream)) => {
                drop(stream);
                ProbeOutcome::up(start.elapsed().as_millis() as u64, None)
            }
            Ok(Err(err)) => {
                error!("Host check failed for {host}:{port} - {err}");
                ProbeOutcome::down(start.elapsed().as_millis() as u64, None)
            }
            // Timed out waiting for the connect; report the full timeout as
            // the duration.
            Err(_) => ProbeOutcome::down(timeout_duration.as_millis() as u64, None),
        }
    }
}

/// HTTP(S) reachability checker: a HEAD request, with any status in
/// [200, 400) counting as up. The client's default redirect handling applies.
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    pub async fn check(&self, url: &str, timeout_duration: Duration) -> ProbeOutcome {
        let start = Instant::now();

        match self.client.head(url).timeout(timeout_duration).send().await {
            Ok(response) => {
                let duration = start.elapsed().as_millis() as u64;
                let status_code = response.status().as_u16();
                if (200..400).contains(&status_code) {
                    ProbeOutcome::up(duration, Some(status_code))
                } else {
                    ProbeOutcome::down(duration, Some(status_code))
                }
            }
            Err(err) => {
                error!("URL check failed for {url} - {err}");
                ProbeOutcome::down(start.elapsed().as_millis() as u64, None)
            }
        }
    }
}

/// Dispatches each service to the checker matching its configured type.
pub struct ServiceProber {
    http_checker: HttpChecker,
    tcp_checker: TcpChecker,
}

impl ServiceProber {
    pub fn new() -> Result<Self> {
        Ok(Self { http_checker: HttpChecker::new()?, tcp_checker: TcpChecker })
    }
}

#[async_trait::async_trait]
impl Prober for ServiceProber {
    async fn probe(&self, config: &ServiceConfig) -> ProbeOutcome {
        let timeout_duration = Duration::from_secs(config.timeout);

        match config.kind {
            ServiceKind::Url => self.http_checker.check(&config.address, timeout_duration).await,
            ServiceKind::Host => match config.port {
                Some(port) => {
                    self.tcp_checker.check(&config.address, port, timeout_duration).await
                }
                None => {
                    error!("Host check failed for {} - no port configured", config.address);
                    ProbeOutcome::down(0, None)
                }
            },
        }
    }
}
