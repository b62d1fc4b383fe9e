use std::fmt;

use thiserror::Error;

/// Result type for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Everything that can go wrong between an agent's tool call and its answer
#[derive(Error, Debug, Clone)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Argument object could not be decoded at all
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// A validation rule rejected the arguments; the message is caller-facing
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// A third-party service answered, but with a failure
    #[error("{service} error: {message}")]
    Upstream { service: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters(message.into())
    }

    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Map an upstream HTTP status code onto an error variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Self::Authentication(message),
            403 => Self::Permission(message),
            404 => Self::NotFound(message),
            408 | 504 => Self::Timeout(message),
            429 => Self::RateLimit(message),
            500..=599 => Self::upstream(format!("HTTP {status}"), message),
            _ => Self::Network(message),
        }
    }

    /// Text for the `error_message` of an envelope.
    ///
    /// Rule failures keep their hand-written wording ("query is required");
    /// other errors keep their prefix so the cause stays visible.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::InvalidParameters(message) => message.clone(),
            Self::InvalidField { field, message } => format!("{field}: {message}"),
            other => other.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::InvalidParameters(_) | Self::InvalidField { .. } | Self::Validation(_) => {
                ErrorCategory::InvalidInput
            }
            Self::Execution(_) | Self::Internal(_) => ErrorCategory::Internal,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Authentication(_) | Self::Permission(_) => ErrorCategory::Access,
            Self::RateLimit(_) => ErrorCategory::RateLimit,
            Self::Upstream { .. } => ErrorCategory::Upstream,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }

    /// Worth calling the provider again later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Timeout | ErrorCategory::RateLimit
        )
    }

    /// Caused by the caller's input or credentials rather than by us
    pub fn is_user_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::InvalidInput | ErrorCategory::Access | ErrorCategory::NotFound
        )
    }
}

/// Coarse error classes used in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    NotFound,
    InvalidInput,
    Internal,
    Network,
    Timeout,
    Access,
    RateLimit,
    Upstream,
    Serialization,
    Configuration,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidInput => "invalid_input",
            Self::Internal => "internal",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Access => "access",
            Self::RateLimit => "rate_limit",
            Self::Upstream => "upstream",
            Self::Serialization => "serialization",
            Self::Configuration => "configuration",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for ToolError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout(err.to_string());
        }
        match err.status() {
            Some(status) => Self::from_status(status.as_u16(), err.to_string()),
            None => Self::Network(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_classification() {
        let err = ToolError::not_found("search_hotels");
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.is_retryable());
        assert!(err.is_user_error());

        let err = ToolError::network("connection reset");
        assert!(err.is_retryable());
        assert!(!err.is_user_error());

        let err = ToolError::validation("query is required");
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
        assert!(err.is_user_error());
    }

    #[test]
    fn test_user_message() {
        assert_eq!(
            ToolError::validation("query is required").user_message(),
            "query is required"
        );
        assert_eq!(
            ToolError::invalid_field("adults", "must be at least 1").user_message(),
            "adults: must be at least 1"
        );
        assert_eq!(
            ToolError::network("dns failure").user_message(),
            "Network error: dns failure"
        );
        assert_eq!(
            ToolError::upstream("SerpAPI", "Invalid API key.").user_message(),
            "SerpAPI error: Invalid API key."
        );
    }

    #[test]
    fn test_status_mapping() {
        let category = |status| ToolError::from_status(status, "x").category();
        assert_eq!(category(401), ErrorCategory::Access);
        assert_eq!(category(403), ErrorCategory::Access);
        assert_eq!(category(429), ErrorCategory::RateLimit);
        assert_eq!(category(504), ErrorCategory::Timeout);
        assert_eq!(category(503), ErrorCategory::Upstream);
        assert_eq!(category(418), ErrorCategory::Network);
        assert_eq!(ErrorCategory::RateLimit.to_string(), "rate_limit");
    }
}
