//! Transport configuration.
//!
//! # Design
//! All settings have defaults, so `TransportConfig::default()` is a working
//! configuration. The struct deserializes from JSON (or any serde format)
//! with missing fields filled from the defaults, and `validate` runs before
//! the agent is built so a bad setting fails at startup rather than on the
//! first request.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransportError};
use crate::tls::TrustPolicy;

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings used by `Transport::new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Seconds allowed for establishing the connection, TLS included.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for a whole call, from connect to the last body byte.
    pub timeout_secs: u64,
    /// Certificate and hostname validation policy.
    pub trust: TrustPolicy,
    /// Optional `User-Agent` header value.
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            trust: TrustPolicy::default(),
            user_agent: None,
        }
    }
}

impl TransportConfig {
    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_trust(mut self, trust: TrustPolicy) -> Self {
        self.trust = trust;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout_secs == 0 {
            return Err(TransportError::Config(
                "connect timeout must be at least one second".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(TransportError::Config(
                "call timeout must be at least one second".to_string(),
            ));
        }
        if self.connect_timeout_secs > self.timeout_secs {
            return Err(TransportError::Config(format!(
                "connect timeout ({}s) exceeds call timeout ({}s)",
                self.connect_timeout_secs, self.timeout_secs
            )));
        }
        if let Some(agent) = &self.user_agent {
            let printable = agent.bytes().all(|b| b == b' ' || b == b'\t' || b.is_ascii_graphic());
            if agent.is_empty() || !printable {
                return Err(TransportError::Config(format!(
                    "user agent {agent:?} is not a valid header value"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TransportConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.trust, TrustPolicy::TrustAll);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: TransportConfig =
            serde_json::from_str(r#"{"timeout_secs": 60, "trust": "verified"}"#).unwrap();
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert_eq!(config.trust, TrustPolicy::Verified);
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let config = TransportConfig::default().with_timeout_secs(0);
        assert!(matches!(config.validate(), Err(TransportError::Config(_))));
        let config = TransportConfig::default().with_connect_timeout_secs(0);
        assert!(matches!(config.validate(), Err(TransportError::Config(_))));
    }

    #[test]
    fn builders_keep_exact_seconds() {
        let config = TransportConfig::default()
            .with_connect_timeout_secs(3)
            .with_timeout_secs(45);
        assert_eq!(config.connect_timeout(), Duration::from_secs(3));
        assert_eq!(config.timeout(), Duration::from_secs(45));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn connect_timeout_cannot_exceed_call_timeout() {
        let config = TransportConfig::default()
            .with_connect_timeout_secs(20)
            .with_timeout_secs(5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn user_agent_must_be_a_header_value() {
        assert!(TransportConfig::default()
            .with_user_agent("json-transport/0.1")
            .validate()
            .is_ok());
        assert!(TransportConfig::default()
            .with_user_agent("bad\nagent")
            .validate()
            .is_err());
        assert!(TransportConfig::default().with_user_agent("").validate().is_err());
    }
}
