use std::time::Duration;

/// Timeouts and monitoring switches for an [`InstrumentedSession`](super::InstrumentedSession).
///
/// Monitoring is disabled by default and there is no timeout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorConfig {
    /// `None` means statements may run indefinitely.
    pub statement_timeout: Option<Duration>,
    pub slow_statement_threshold: Option<Duration>,
    pub monitoring_enabled: bool,
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements running longer than `timeout` fail with `CqlError::Timeout`.
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = Some(timeout);
        self
    }

    /// Statements running longer than `threshold` trigger `on_slow_statement`.
    pub fn with_slow_statement_threshold(mut self, threshold: Duration) -> Self {
        self.slow_statement_threshold = Some(threshold);
        self
    }

    pub fn enable_monitoring(mut self) -> Self {
        self.monitoring_enabled = true;
        self
    }

    pub fn disable_monitoring(mut self) -> Self {
        self.monitoring_enabled = false;
        self
    }
}
