//! Runtime configuration.

use std::net::SocketAddr;

use crate::error::{Error, Result};
use crate::playback::SpeedTier;

/// Configuration for the visualization server.
#[derive(Debug, Clone, PartialEq)]
pub struct VisConfig {
    /// HTTP API listen address
    pub api_addr: SocketAddr,

    /// Speed tier playback starts with
    pub speed: SpeedTier,

    /// Algorithm preselected at startup, loaded with its default input
    pub algorithm: String,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            api_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            speed: SpeedTier::Medium,
            algorithm: "bubble-sort".to_string(),
        }
    }
}

impl VisConfig {
    /// Create config from environment variables with defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let api_addr = match lookup("STEPVIZ_API_ADDR") {
            Some(raw) => raw.parse().map_err(|e| invalid("STEPVIZ_API_ADDR", e))?,
            None => defaults.api_addr,
        };

        let speed = match lookup("STEPVIZ_SPEED") {
            Some(raw) => {
                let tier: u8 = raw.trim().parse().map_err(|e| invalid("STEPVIZ_SPEED", e))?;
                SpeedTier::try_from(tier).map_err(|e| invalid("STEPVIZ_SPEED", e))?
            }
            None => defaults.speed,
        };

        let algorithm = lookup("STEPVIZ_ALGORITHM")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.algorithm);

        Ok(Self {
            api_addr,
            speed,
            algorithm,
        })
    }

    /// Replace the port of the listen address.
    pub fn with_port(mut self, port: u16) -> Self {
        self.api_addr.set_port(port);
        self
    }
}

fn invalid(key: &str, reason: impl ToString) -> Error {
    Error::InvalidConfig {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
