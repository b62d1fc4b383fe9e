//! Dealhunter Tools - the seam between an agent runtime and deterministic code
//!
//! An agent calls a tool by name with a JSON object of arguments and gets a
//! [`ToolResult`] back. This crate holds the pieces on our side of that call:
//!
//! - [`Tool`]: name, description, JSON-schema parameter declaration and `execute`
//! - [`validation`]: declarative argument rules with caller-facing messages
//! - [`ToolRegistry`]: lookup by name and concurrent batch execution
//!
//! ## Example Usage
//!
//! ```rust
//! use dealhunter_tools::prelude::*;
//!
//! /// Uppercases a currency code.
//! struct CurrencyTool;
//!
//! #[async_trait]
//! impl Tool for CurrencyTool {
//!     fn name(&self) -> &str { "normalize_currency" }
//!     fn description(&self) -> &str { "Uppercase an ISO currency code" }
//!     fn category(&self) -> ToolCategory { ToolCategory::Custom }
//!
//!     fn parameter_schema(&self) -> Value {
//!         ToolParameters::new_schema()
//!             .add_required("currency", "string", "Three-letter code")
//!             .into()
//!     }
//!
//!     async fn execute(&self, params: ToolParameters, _ctx: ToolContext) -> Result<ToolResult> {
//!         let currency: String = params.get("currency")?;
//!         Ok(ToolResult::success(currency.to_uppercase()))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut registry = ToolRegistry::new();
//!     registry.register_tool(Box::new(CurrencyTool)).await?;
//!
//!     let result = registry
//!         .execute_tool("normalize_currency", &json!({"currency": "eur"}), &ToolContext::new())
//!         .await?;
//!     assert_eq!(result.content, "EUR");
//!     Ok(())
//! }
//! ```

/// Tool trait, arguments, context and results.
pub mod core;
pub mod error;
/// Name-indexed tool lookup and execution.
pub mod registry;
pub mod validation;

pub use core::{
    ContentType, Tool, ToolCapability, ToolCategory, ToolContext, ToolInfo, ToolParameters,
    ToolResult,
};

pub use error::{ErrorCategory, Result, ToolError};
pub use registry::{ToolRegistry, ToolRequest};

/// Prelude module for convenient imports
pub mod prelude {
    pub use async_trait::async_trait;
    pub use serde_json::{Value, json};
    pub use uuid::Uuid;

    pub use crate::{
        core::{
            ContentType, Tool, ToolCapability, ToolCategory, ToolContext, ToolInfo,
            ToolParameters, ToolResult,
        },
        error::{ErrorCategory, Result, ToolError},
        registry::{ToolRegistry, ToolRequest},
        validation::{ParameterValidator, ValidationRule, ValueType},
    };
}
