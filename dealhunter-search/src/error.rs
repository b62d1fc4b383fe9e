//! Error types for the search layer.

use dealhunter_tools::ToolError;
use thiserror::Error;

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Failures talking to the search provider or loading its configuration.
///
/// Ranking itself never fails; these only surface at the tool boundary,
/// where they are folded into an error envelope.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure (connect, timeout, body decode). The request
    /// URL is stripped since it carries the API key.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("Search provider returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Provider answered 200 but reported an error in the payload.
    #[error("Search provider error: {0}")]
    Provider(String),

    /// Top-level response is not a JSON object.
    #[error("Malformed search response: {0}")]
    MalformedResponse(String),

    /// Config file could not be parsed.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

impl SearchError {
    /// Create a new configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new provider error.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

impl From<SearchError> for ToolError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Configuration(msg) => ToolError::configuration(msg),
            SearchError::Http(e) => ToolError::from(e),
            SearchError::Status { status, body } => ToolError::from_status(status, body),
            SearchError::Provider(msg) => ToolError::upstream("Search provider", msg),
            SearchError::MalformedResponse(msg) => ToolError::serialization(msg),
            SearchError::ConfigParse(e) => ToolError::from(e),
        }
    }
}
