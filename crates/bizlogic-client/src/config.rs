//! Client configuration and REST endpoint layout.
//!
//! Reads configuration from environment variables:
//! - `BIZLOGIC_API_URL`: REST API root (default: "http://127.0.0.1:8000/business-logic/rest")
//! - `BIZLOGIC_TIMEOUT_SECS`: per-request timeout in seconds (default: "30")

use std::time::Duration;

use bizlogic_core::{InterfaceId, VersionId};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/business-logic/rest";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_URL_VAR: &str = "BIZLOGIC_API_URL";
pub const TIMEOUT_VAR: &str = "BIZLOGIC_TIMEOUT_SECS";

/// Settings for talking to the REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ClientConfig::default();
        if let Some(url) = lookup(API_URL_VAR).filter(|url| !url.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    "ignoring invalid {}={:?}, using {}s",
                    TIMEOUT_VAR,
                    raw,
                    DEFAULT_TIMEOUT.as_secs()
                ),
            }
        }
        config
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.api_url)
    }
}

/// Collection roots of the REST API, derived from the API root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    root: String,
}

impl Endpoints {
    pub fn new(api_url: &str) -> Self {
        Endpoints {
            root: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn interfaces(&self) -> String {
        format!("{}/program-interface", self.root)
    }

    pub fn interface(&self, id: InterfaceId) -> String {
        format!("{}/program-interface/{}", self.root, id)
    }

    pub fn programs(&self) -> String {
        format!("{}/program", self.root)
    }

    pub fn versions(&self) -> String {
        format!("{}/program-version", self.root)
    }

    pub fn version(&self, id: VersionId) -> String {
        format!("{}/program-version/{}", self.root, id)
    }

    pub fn reference_descriptors(&self) -> String {
        format!("{}/reference/descriptor", self.root)
    }
}
