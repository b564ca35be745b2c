/// Binary reachability verdict of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    ConnectOk,
    ConnectFail,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::ConnectOk => write!(f, "UP"),
            Verdict::ConnectFail => write!(f, "DOWN"),
        }
    }
}

/// Result of a single probe. Probes always resolve to an outcome; transport
/// errors and timeouts become `ConnectFail`, never an `Err`.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// Probe latency in milliseconds. On a TCP timeout this is the timeout
    /// value itself; otherwise it is the elapsed time at resolution.
    pub duration_ms: u64,

    pub verdict: Verdict,

    /// HTTP status code, populated whenever a response arrived (including
    /// non-2xx responses). Absent for TCP probes and transport failures.
    pub status_code: Option<u16>,
}

impl ProbeOutcome {
    pub fn up(duration_ms: u64, status_code: Option<u16>) -> Self {
        Self { duration_ms, verdict: Verdict::ConnectOk, status_code }
    }

    pub fn down(duration_ms: u64, status_code: Option<u16>) -> Self {
        Self { duration_ms, verdict: Verdict::ConnectFail, status_code }
    }

    pub fn is_up(&self) -> bool {
        self.verdict == Verdict::ConnectOk
    }
}
