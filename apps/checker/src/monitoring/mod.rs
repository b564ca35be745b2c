/// Check execution module
///
/// This module is responsible for:
/// - Executing TCP connect and HTTP HEAD probes with a per-service timeout
/// - Deciding which services are due and folding outcomes into their stats
/// - Logging each check and alerting on down services
pub mod checker;
pub mod engine;
pub mod types;

pub use checker::{Prober, ServiceProber};
pub use engine::CheckEngine;
pub use types::{ProbeOutcome, Verdict};
