//! Client configuration.
//!
//! A [`ClientConfig`] can be built in code, parsed from a
//! `cassandra://host[:port][/keyspace]` URL, read from TOML, or taken from the
//! `CASSANDRA_URL` environment variable.

use crate::error::{CqlError, CqlResult};
use crate::monitor::{InstrumentedSession, LoggingMonitor, MonitorConfig};
use crate::schema::{KeywordSet, validate_keyspace_name};
use crate::session::CqlSession;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_PORT: u16 = 9160;

/// Environment variable read by [`ClientConfig::from_env`].
pub const URL_ENV_VAR: &str = "CASSANDRA_URL";

const URL_SCHEME: &str = "cassandra";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Keyspace to `USE` after connecting.
    pub keyspace: Option<String>,
    pub request_timeout: Option<Duration>,
    pub slow_query_threshold: Option<Duration>,
    /// Log every statement to stderr.
    pub logging_enabled: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            keyspace: None,
            request_timeout: None,
            slow_query_threshold: None,
            logging_enabled: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    url: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    keyspace: Option<String>,
    request_timeout_ms: Option<u64>,
    slow_query_threshold_ms: Option<u64>,
    logging_enabled: Option<bool>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = Some(keyspace.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    pub fn logging_enabled(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// `host:port`
    pub fn contact_point(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parse `cassandra://host[:port][/keyspace][?request_timeout_ms=N]`.
    pub fn from_url(url: &str) -> CqlResult<Self> {
        let url = Url::parse(url)?;
        if url.scheme() != URL_SCHEME {
            return Err(CqlError::config(format!(
                "unsupported URL scheme '{}', expected '{URL_SCHEME}'",
                url.scheme()
            )));
        }
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| CqlError::config("URL has no host"))?;

        let mut config = Self::new()
            .host(host)
            .port(url.port().unwrap_or(DEFAULT_PORT));

        let path = url.path().trim_matches('/');
        if !path.is_empty() {
            if path.contains('/') {
                return Err(CqlError::config(format!(
                    "URL path '{path}' must be a single keyspace name"
                )));
            }
            config = config.keyspace(path);
        }

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "request_timeout_ms" => {
                    config.request_timeout = Some(parse_millis(&key, &value)?);
                }
                "slow_query_threshold_ms" => {
                    config.slow_query_threshold = Some(parse_millis(&key, &value)?);
                }
                "logging" => {
                    config.logging_enabled = value.parse().map_err(|_| {
                        CqlError::config(format!("invalid boolean '{value}' for 'logging'"))
                    })?;
                }
                other => {
                    return Err(CqlError::config(format!("unknown URL parameter '{other}'")));
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a TOML document.
    ///
    /// A `url` key is parsed first; the remaining keys override it.
    pub fn from_toml_str(s: &str) -> CqlResult<Self> {
        let file: ConfigFile = toml::from_str(s)?;
        let mut config = match &file.url {
            Some(url) => Self::from_url(url)?,
            None => Self::new(),
        };
        if let Some(host) = file.host {
            config.host = host;
        }
        if let Some(port) = file.port {
            config.port = port;
        }
        if let Some(keyspace) = file.keyspace {
            config.keyspace = Some(keyspace);
        }
        if let Some(ms) = file.request_timeout_ms {
            config.request_timeout = Some(Duration::from_millis(ms));
        }
        if let Some(ms) = file.slow_query_threshold_ms {
            config.slow_query_threshold = Some(Duration::from_millis(ms));
        }
        if let Some(enabled) = file.logging_enabled {
            config.logging_enabled = enabled;
        }
        config.validate()?;
        Ok(config)
    }

    /// Read `CASSANDRA_URL`.
    pub fn from_env() -> CqlResult<Self> {
        let url = std::env::var(URL_ENV_VAR)
            .map_err(|e| CqlError::config(format!("{URL_ENV_VAR}: {e}")))?;
        Self::from_url(&url)
    }

    pub fn validate(&self) -> CqlResult<()> {
        if self.host.trim().is_empty() {
            return Err(CqlError::config("host must not be empty"));
        }
        if self.port == 0 {
            return Err(CqlError::config("port must not be 0"));
        }
        if let Some(keyspace) = &self.keyspace {
            validate_keyspace_name(keyspace, KeywordSet::cql())
                .map_err(|e| CqlError::config(format!("invalid keyspace: {e}")))?;
        }
        Ok(())
    }

    /// Monitoring settings implied by this configuration.
    ///
    /// Monitoring is enabled when logging is on or a slow threshold is set.
    pub fn monitor_config(&self) -> MonitorConfig {
        let mut config = MonitorConfig::new();
        if let Some(timeout) = self.request_timeout {
            config = config.with_statement_timeout(timeout);
        }
        if let Some(threshold) = self.slow_query_threshold {
            config = config.with_slow_statement_threshold(threshold);
        }
        if self.logging_enabled || self.slow_query_threshold.is_some() {
            config = config.enable_monitoring();
        }
        config
    }

    /// Wrap `session` with the monitoring this configuration asks for.
    pub fn instrument<S: CqlSession>(&self, session: S) -> InstrumentedSession<S> {
        let mut monitor = LoggingMonitor::new();
        if !self.logging_enabled {
            if let Some(threshold) = self.slow_query_threshold {
                monitor = monitor.min_duration(threshold);
            }
        }
        InstrumentedSession::new(session)
            .with_config(self.monitor_config())
            .with_monitor(monitor)
    }
}

fn parse_millis(key: &str, value: &str) -> CqlResult<Duration> {
    value
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| CqlError::config(format!("invalid millisecond value '{value}' for '{key}'")))
}
