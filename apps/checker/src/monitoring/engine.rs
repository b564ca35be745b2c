use std::sync::Arc;

use tracing::{info, warn};

use super::checker::Prober;
use crate::models::Service;

/// Walks the service list in order, probes everything that is due, and folds
/// the outcomes into each record. Services run one at a time; a probe blocks
/// the loop for at most its own timeout.
pub struct CheckEngine {
    prober: Arc<dyn Prober>,
}

impl CheckEngine {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }

    /// Run one pass over the services at `now` (epoch seconds). Returns
    /// whether at least one check executed, which is what gates the save.
    pub async fn run(&self, services: &mut [Service], now: i64) -> bool {
        let mut check_executed = false;

        for service in services.iter_mut() {
            if !service.is_due(now) {
                continue;
            }

            let label = service.config.label();
            info!("Checking {label}...");

            let outcome = self.prober.probe(&service.config).await;
            service.record_outcome(&outcome, now);
            check_executed = true;

            info!("{label} - {} ({}ms)", outcome.verdict, outcome.duration_ms);
            if !service.status.is_up {
                warn!("SERVICE DOWN: {label}");
            }
        }

        check_executed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Service, ServiceConfig, ServiceKind, ServiceStats, ServiceStatus, Window,
        service::THIRTY_DAYS_SECS,
    };
    use crate::monitoring::types::ProbeOutcome;
    use std::collections::HashMap;

    /// Scripted prober: resolves each address to a fixed outcome, recording
    /// which addresses were actually probed.
    struct ScriptedProber {
        outcomes: HashMap<String, ProbeOutcome>,
        probed: std::sync::Mutex<Vec<String>>,
    }

    impl ScriptedProber {
        fn new(outcomes: HashMap<String, ProbeOutcome>) -> Self {
            Self { outcomes, probed: std::sync::Mutex::new(Vec::new()) }
        }
    }

    #[async_trait::async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, config: &ServiceConfig) -> ProbeOutcome {
            self.probed.lock().unwrap().push(config.address.clone());
            self.outcomes
                .get(&config.address)
                .cloned()
                .unwrap_or_else(|| ProbeOutcome::down(0, None))
        }
    }

    fn service(address: &str, kind: ServiceKind, last_check: i64, is_up: bool) -> Service {
        Service {
            config: ServiceConfig {
                address: address.to_string(),
                kind,
                port: if kind == ServiceKind::Host { Some(80) } else { None },
                timeout: 5,
                check_interval: 300,
            },
            status: ServiceStatus { is_up, last_check, last_result_duration: 0 },
            stats: ServiceStats::starting_at(last_check),
        }
    }

    #[tokio::test]
    async fn due_reachable_host_is_marked_up_and_counted() {
        let now = 1_700_000_000;
        let mut services = vec![service("example.com", ServiceKind::Host, now - 400, true)];
        let prober = ScriptedProber::new(HashMap::from([(
            "example.com".to_string(),
            ProbeOutcome::up(17, None),
        )]));

        let engine = CheckEngine::new(Arc::new(prober));
        let checked = engine.run(&mut services, now).await;

        assert!(checked);
        let service = &services[0];
        assert!(service.status.is_up);
        assert_eq!(service.status.last_check, now);
        assert_eq!(service.status.last_result_duration, 17);
        assert_eq!(service.stats.all_time.total, 1);
        assert_eq!(service.stats.all_time.successful, 1);
        assert_eq!(service.stats.last_30d.counts.total, 1);
        assert_eq!(service.stats.last_365d.counts.total, 1);
        assert_eq!(service.stats.last_30d.uptime, 100.0);
    }

    #[tokio::test]
    async fn url_returning_503_is_marked_down() {
        let now = 1_700_000_000;
        let mut services = vec![service("https://example.com", ServiceKind::Url, now - 400, true)];
        let prober = ScriptedProber::new(HashMap::from([(
            "https://example.com".to_string(),
            ProbeOutcome::down(230, Some(503)),
        )]));

        let engine = CheckEngine::new(Arc::new(prober));
        assert!(engine.run(&mut services, now).await);

        let service = &services[0];
        assert!(!service.status.is_up);
        assert_eq!(service.stats.all_time.total, 1);
        assert_eq!(service.stats.all_time.successful, 0);
        assert_eq!(service.stats.last_30d.uptime, 0.0);
    }

    #[tokio::test]
    async fn services_not_due_are_left_untouched() {
        let now = 1_700_000_000;
        let mut services = vec![service("example.com", ServiceKind::Host, now - 100, true)];
        let prober = ScriptedProber::new(HashMap::new());

        let engine = CheckEngine::new(Arc::new(prober));
        let checked = engine.run(&mut services, now).await;

        assert!(!checked);
        let service = &services[0];
        assert_eq!(service.status.last_check, now - 100);
        assert_eq!(service.stats.all_time.total, 0);
    }

    #[tokio::test]
    async fn only_due_services_are_probed() {
        let now = 1_700_000_000;
        let mut services = vec![
            service("due.example", ServiceKind::Host, now - 400, true),
            service("fresh.example", ServiceKind::Host, now - 100, true),
            // Down 2 minutes ago: fast retry applies even with interval 300.
            service("down.example", ServiceKind::Host, now - 120, false),
        ];
        let prober = Arc::new(ScriptedProber::new(HashMap::from([
            ("due.example".to_string(), ProbeOutcome::up(5, None)),
            ("down.example".to_string(), ProbeOutcome::up(9, None)),
        ])));

        let engine = CheckEngine::new(prober.clone());
        assert!(engine.run(&mut services, now).await);

        let probed = prober.probed.lock().unwrap().clone();
        assert_eq!(probed, vec!["due.example".to_string(), "down.example".to_string()]);
        // The recovered service is back up.
        assert!(services[2].status.is_up);
    }

    #[tokio::test]
    async fn expired_window_is_reset_before_counting() {
        let now = 1_700_000_000;
        let mut services = vec![service("example.com", ServiceKind::Host, now - 400, true)];
        services[0].stats.last_30d = Window {
            counts: crate::models::Counter { total: 900, successful: 900 },
            uptime: 100.0,
            last_reset: now - THIRTY_DAYS_SECS - 86_400,
        };
        let prober = ScriptedProber::new(HashMap::from([(
            "example.com".to_string(),
            ProbeOutcome::down(5_000, None),
        )]));

        let engine = CheckEngine::new(Arc::new(prober));
        assert!(engine.run(&mut services, now).await);

        let window = &services[0].stats.last_30d;
        assert_eq!(window.last_reset, now);
        assert_eq!(window.counts.total, 1);
        assert_eq!(window.counts.successful, 0);
        assert_eq!(window.uptime, 0.0);
    }
}
