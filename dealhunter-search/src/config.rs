//! Search provider configuration.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SearchError},
    ranking::DEFAULT_TOP_N,
};

/// Default SerpAPI search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://serpapi.com/search";

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "SERPAPI_API_KEY";

/// Environment variable overriding the provider endpoint.
pub const ENDPOINT_ENV: &str = "SERPAPI_ENDPOINT";

/// Settings injected into the search client and tools at construction time.
///
/// Nothing in the ranking path reads process state; the credential only
/// reaches the HTTP client through this value.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Provider API key
    pub api_key: Option<String>,
    /// Provider endpoint URL
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Currency used when a tool call does not name one
    pub currency: String,
    /// Interface language (`hl`) used when a tool call does not name one
    pub hl: String,
    /// Geo region (`gl`) used when a tool call does not name one
    pub gl: String,
    /// Shortlist length used when a tool call does not name one
    pub top_n: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
            currency: "USD".to_string(),
            hl: "en".to_string(),
            gl: "us".to_string(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl SearchConfig {
    /// Create a config with defaults and no API key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `SERPAPI_API_KEY` / `SERPAPI_ENDPOINT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = lookup(ENDPOINT_ENV)
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self {
            api_key: lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()),
            endpoint,
            ..Self::default()
        }
    }

    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The API key, or a configuration error naming the variable to set.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                SearchError::configuration(format!(
                    "search provider API key is not configured (set {API_KEY_ENV})"
                ))
            })
    }

    /// Check the values that would otherwise fail later at request time.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(SearchError::configuration("endpoint must not be empty"));
        }
        if self.top_n == 0 {
            return Err(SearchError::configuration("top_n must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(SearchError::configuration("timeout_secs must be at least 1"));
        }
        Ok(())
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("currency", &self.currency)
            .field("hl", &self.hl)
            .field("gl", &self.gl)
            .field("top_n", &self.top_n)
            .finish()
    }
}
