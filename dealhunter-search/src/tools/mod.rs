//! Agent-facing search tools.
//!
//! Both tools answer with the same envelope:
//! `{"status": "success", "results": [...]}` or
//! `{"status": "error", "error_message": "..."}`. Bad parameters and
//! provider failures become error envelopes; `Tool::execute` only returns
//! `Err` if the envelope itself cannot be serialized.

use dealhunter_tools::{ContentType, ToolError, ToolResult};
use serde::{Deserialize, Serialize};

pub mod flights;
pub mod hotels;

pub use flights::{FlightQuery, FlightSearchTool};
pub use hotels::{HotelQuery, HotelSearchTool};

/// Date format accepted for every date parameter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Result envelope returned across the tool boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome<T> {
    Success { results: Vec<T> },
    Error { error_message: String },
}

impl<T> SearchOutcome<T> {
    pub fn success(results: Vec<T>) -> Self {
        Self::Success { results }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error_message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn results(&self) -> Option<&[T]> {
        match self {
            Self::Success { results } => Some(results),
            Self::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { error_message } => Some(error_message),
        }
    }
}

impl<T> From<ToolError> for SearchOutcome<T> {
    fn from(err: ToolError) -> Self {
        Self::error(err.user_message())
    }
}

impl<T: Serialize> SearchOutcome<T> {
    /// Wrap the envelope as a JSON tool result.
    pub fn into_tool_result(self) -> dealhunter_tools::Result<ToolResult> {
        let content = serde_json::to_string(&self)?;
        let result = match self {
            Self::Success { results } => ToolResult::success(content)
                .with_metadata("result_count", serde_json::json!(results.len())),
            Self::Error { error_message } => ToolResult::error(error_message).with_content(content),
        };
        Ok(result.with_content_type(ContentType::Json))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_envelope_shape() {
        let ok: SearchOutcome<u32> = SearchOutcome::success(vec![1, 2]);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"status": "success", "results": [1, 2]})
        );

        let err: SearchOutcome<u32> = ToolError::validation("query is required").into();
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"status": "error", "error_message": "query is required"})
        );

        let parsed: SearchOutcome<u32> =
            serde_json::from_value(json!({"status": "success", "results": []})).unwrap();
        assert_eq!(parsed.results(), Some(&[][..]));
    }

    #[test]
    fn test_tool_result_carries_envelope() {
        let result = SearchOutcome::<u32>::error("upstream down")
            .into_tool_result()
            .unwrap();
        assert!(result.is_error());
        assert_eq!(result.error.as_deref(), Some("upstream down"));
        assert_eq!(result.content_type, ContentType::Json);
        assert_eq!(result.json().unwrap()["status"], json!("error"));

        let result = SearchOutcome::success(vec!["a"]).into_tool_result().unwrap();
        assert!(result.is_success());
        assert_eq!(result.get_metadata::<usize>("result_count"), Some(1));
    }
}
