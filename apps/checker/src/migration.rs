//! Upgrade of legacy flat service records into the current nested
//! {config, status, stats} shape.
//!
//! The discriminant is the presence of a `config` key: records that have one
//! are passed through untouched, everything else is treated as legacy and
//! rebuilt field by field with defaults for whatever is missing. Migration is
//! pure and total; it happens in memory on every load and is only persisted
//! once some check writes the document back.

use serde::Deserialize;

use crate::models::{
    Counter, Service, ServiceConfig, ServiceKind, ServiceStats, ServiceStatus, Window,
    service::{DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS},
};

/// One element of the persisted document, current- or legacy-shaped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StoredService {
    Current(Service),
    Legacy(LegacyService),
}

impl StoredService {
    /// Resolve to the current shape, migrating if needed. `now` seeds the
    /// window clocks of freshly migrated records, so a migrated window can
    /// defer its first reset by up to the full window length.
    pub fn into_current(self, now: i64) -> Service {
        match self {
            StoredService::Current(service) => service,
            StoredService::Legacy(legacy) => legacy.migrate(now),
        }
    }
}

/// The old flat record layout. Everything except the target identity is
/// optional.
#[derive(Debug, Deserialize)]
pub struct LegacyService {
    pub address: String,
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    pub port: Option<u16>,
    pub timeout: Option<u64>,
    #[serde(rename = "checkInterval")]
    pub check_interval: Option<i64>,
    #[serde(rename = "isUp")]
    pub is_up: Option<bool>,
    #[serde(rename = "lastCheck")]
    pub last_check: Option<i64>,
    #[serde(rename = "lastResultDuration")]
    pub last_result_duration: Option<u64>,
    #[serde(rename = "totalChecks")]
    pub total_checks: Option<u64>,
    #[serde(rename = "successfulChecks")]
    pub successful_checks: Option<u64>,
    #[serde(default)]
    pub checks: LegacyChecks,
    #[serde(default)]
    pub uptime: LegacyUptime,
}

/// The old nested counter map. Flat `totalChecks`/`successfulChecks` take
/// precedence over `checks.total`/`checks.successful` when both exist.
#[derive(Debug, Default, Deserialize)]
pub struct LegacyChecks {
    pub total: Option<u64>,
    pub successful: Option<u64>,
    #[serde(rename = "total30d")]
    pub total_30d: Option<u64>,
    #[serde(rename = "successful30d")]
    pub successful_30d: Option<u64>,
    #[serde(rename = "lastReset30d")]
    pub last_reset_30d: Option<i64>,
    #[serde(rename = "total365d")]
    pub total_365d: Option<u64>,
    #[serde(rename = "successful365d")]
    pub successful_365d: Option<u64>,
    #[serde(rename = "lastReset365d")]
    pub last_reset_365d: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LegacyUptime {
    #[serde(rename = "30d")]
    pub last_30d: Option<f64>,
    #[serde(rename = "365d")]
    pub last_365d: Option<f64>,
}

impl LegacyService {
    fn migrate(self, now: i64) -> Service {
        Service {
            config: ServiceConfig {
                address: self.address,
                kind: self.kind,
                port: self.port,
                timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
                check_interval: self.check_interval.unwrap_or(DEFAULT_CHECK_INTERVAL_SECS),
            },
            status: ServiceStatus {
                // The stored isUp is deliberately ignored: migrated records
                // always come back up, even from an explicit false. Observable
                // behavior consumers already rely on.
                is_up: true,
                last_check: self.last_check.unwrap_or(0),
                last_result_duration: self.last_result_duration.unwrap_or(0),
            },
            stats: ServiceStats {
                all_time: Counter {
                    total: self.total_checks.or(self.checks.total).unwrap_or(0),
                    successful: self.successful_checks.or(self.checks.successful).unwrap_or(0),
                },
                last_30d: Window {
                    counts: Counter {
                        total: self.checks.total_30d.unwrap_or(0),
                        successful: self.checks.successful_30d.unwrap_or(0),
                    },
                    uptime: self.uptime.last_30d.unwrap_or(100.0),
                    last_reset: self.checks.last_reset_30d.unwrap_or(now),
                },
                last_365d: Window {
                    counts: Counter {
                        total: self.checks.total_365d.unwrap_or(0),
                        successful: self.checks.successful_365d.unwrap_or(0),
                    },
                    uptime: self.uptime.last_365d.unwrap_or(100.0),
                    last_reset: self.checks.last_reset_365d.unwrap_or(now),
                },
            },
        }
    }
}
