use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Events host used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://noowave.heroku.com/events.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Base URL of the events feed; query parameters are appended to it
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout covering connect and body (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent to the events host
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// How often `watch` refreshes the viewport (seconds)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("event-fetcher/{}", env!("CARGO_PKG_VERSION"))
}

fn default_refresh_interval() -> u64 {
    60 // 1 minute
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl EventsConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Toml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn example() -> Self {
        EventsConfig {
            endpoint: default_endpoint(),
            request_timeout_secs: 15,
            user_agent: default_user_agent(),
            refresh_interval_secs: 120,
        }
    }

    /// The endpoint as a URL the query builder can extend.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|source| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::UnsupportedEndpoint(self.endpoint.clone()));
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}
