use serde::{Deserialize, Serialize};

use crate::monitoring::types::ProbeOutcome;

/// Down services are retried on this fixed cadence regardless of their
/// configured interval, so recovery is noticed quickly.
pub const DOWN_RETRY_SECS: i64 = 60;

pub const THIRTY_DAYS_SECS: i64 = 30 * 24 * 60 * 60;
pub const YEAR_SECS: i64 = 365 * 24 * 60 * 60;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CHECK_INTERVAL_SECS: i64 = 300;

/// How a service is probed: `url` targets get an HTTP HEAD request, `host`
/// targets get a raw TCP connect against `config.port`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Url,
    Host,
}

/// Per-service probe configuration. Immutable during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub address: String,
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    pub port: Option<u16>,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(rename = "checkInterval", default = "default_check_interval")]
    pub check_interval: i64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_check_interval() -> i64 {
    DEFAULT_CHECK_INTERVAL_SECS
}

impl ServiceConfig {
    /// Display label shared by log lines and the status page: `address[:port]`.
    pub fn label(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.address, port),
            None => self.address.clone(),
        }
    }
}

/// Live state, rewritten on every executed check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(rename = "isUp")]
    pub is_up: bool,
    /// Epoch seconds of the last executed probe, 0 if never checked.
    #[serde(rename = "lastCheck")]
    pub last_check: i64,
    /// Latency of the last probe in milliseconds.
    #[serde(rename = "lastResultDuration")]
    pub last_result_duration: u64,
}

impl Default for ServiceStatus {
    fn default() -> Self {
        // New services start optimistic.
        Self { is_up: true, last_check: 0, last_result_duration: 0 }
    }
}

/// Probe counts shared by every aggregation window.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Counter {
    pub total: u64,
    pub successful: u64,
}

impl Counter {
    pub fn record(&mut self, up: bool) {
        self.total += 1;
        if up {
            self.successful += 1;
        }
    }
}

/// A rolling aggregation window (30-day or 365-day): counters plus a stored
/// uptime percentage and the epoch second the window last started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Window {
    #[serde(flatten)]
    pub counts: Counter,
    pub uptime: f64,
    #[serde(rename = "lastReset")]
    pub last_reset: i64,
}

impl Window {
    pub fn starting_at(now: i64) -> Self {
        Self { counts: Counter::default(), uptime: 100.0, last_reset: now }
    }

    /// Zero the window and restart its clock once its age exceeds the
    /// retention period. Runs strictly before the current probe is counted,
    /// so a fresh window only ever contains post-reset probes.
    pub fn reset_if_expired(&mut self, now: i64, retention_secs: i64) -> bool {
        if self.last_reset < now - retention_secs {
            self.counts = Counter::default();
            self.last_reset = now;
            true
        } else {
            false
        }
    }

    /// Count one probe result and recompute the stored uptime percentage.
    pub fn observe(&mut self, up: bool) {
        self.counts.record(up);
        self.uptime = uptime_percent(self.counts.successful, self.counts.total);
    }
}

/// Uptime percentage with one decimal of precision. A window with no probes
/// reads as fully up, not unknown.
pub fn uptime_percent(successful: u64, total: u64) -> f64 {
    if total > 0 {
        (successful as f64 / total as f64 * 1000.0).round() / 10.0
    } else {
        100.0
    }
}

/// The three aggregation windows. The all-time window never resets and
/// stores no uptime percentage; consumers derive it on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStats {
    #[serde(rename = "allTime")]
    pub all_time: Counter,
    #[serde(rename = "30d")]
    pub last_30d: Window,
    #[serde(rename = "365d")]
    pub last_365d: Window,
}

impl ServiceStats {
    pub fn starting_at(now: i64) -> Self {
        Self {
            all_time: Counter::default(),
            last_30d: Window::starting_at(now),
            last_365d: Window::starting_at(now),
        }
    }
}

/// One monitored target: probe configuration, live status, and rolling
/// statistics. Records are only ever mutated by the check engine while the
/// service is due.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub config: ServiceConfig,
    pub status: ServiceStatus,
    pub stats: ServiceStats,
}

impl Service {
    /// A service is due when its configured interval has elapsed, or when it
    /// is down and the fast retry cadence has elapsed. Both bounds are
    /// inclusive.
    pub fn is_due(&self, now: i64) -> bool {
        let elapsed = now - self.status.last_check;
        elapsed >= self.config.check_interval
            || (!self.status.is_up && elapsed >= DOWN_RETRY_SECS)
    }

    /// Fold one probe outcome into the record: status fields first, then
    /// expired-window resets, then counting in all three windows, then the
    /// uptime recompute.
    pub fn record_outcome(&mut self, outcome: &ProbeOutcome, now: i64) {
        self.status.last_result_duration = outcome.duration_ms;
        self.status.last_check = now;
        self.status.is_up = outcome.is_up();

        self.stats.last_30d.reset_if_expired(now, THIRTY_DAYS_SECS);
        self.stats.last_365d.reset_if_expired(now, YEAR_SECS);

        let up = self.status.is_up;
        self.stats.all_time.record(up);
        self.stats.last_30d.observe(up);
        self.stats.last_365d.observe(up);
    }
}
