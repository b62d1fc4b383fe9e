use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::error::{Result, ToolError};

/// A function an agent can call by name with a JSON object of arguments
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the agent calls the tool by
    fn name(&self) -> &str;

    /// One-line description shown to the agent
    fn description(&self) -> &str;

    fn category(&self) -> ToolCategory;

    /// JSON schema of the argument object
    fn parameter_schema(&self) -> Value;

    /// Run the tool
    async fn execute(&self, parameters: ToolParameters, context: ToolContext)
    -> Result<ToolResult>;

    /// Check arguments before `execute`; defaults to the JSON schema
    async fn validate_parameters(&self, parameters: &ToolParameters) -> Result<()> {
        self.validate_against_schema(parameters)
    }

    fn capabilities(&self) -> Vec<ToolCapability> {
        vec![ToolCapability::Basic]
    }

    /// Validate arguments against `parameter_schema`, reporting every violation
    fn validate_against_schema(&self, parameters: &ToolParameters) -> Result<()> {
        let schema = self.parameter_schema();
        let validator = jsonschema::Validator::new(&schema)
            .map_err(|e| ToolError::internal(format!("Invalid schema for '{}': {e}", self.name())))?;

        let violations: Vec<String> = validator
            .iter_errors(parameters.inner())
            .map(|e| e.to_string())
            .collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ToolError::validation(violations.join("; ")))
        }
    }
}

/// Grouping used when listing tools to an agent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolCategory {
    /// Flight and hotel inventory searches
    Travel,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolCapability {
    Basic,
    /// Needs a credential from configuration
    Authenticated,
    /// Calls out to the network
    NetworkRequired,
    /// No side effects besides the outbound request
    ReadOnly,
}

/// The argument object of a tool call, also used to build parameter schemas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    inner: Value,
}

impl ToolParameters {
    pub fn new(value: Value) -> Self {
        Self { inner: value }
    }

    /// Empty object schema to be extended with `add_required`/`add_optional`
    pub fn new_schema() -> Self {
        Self::new(json!({
            "type": "object",
            "properties": {},
            "required": []
        }))
    }

    pub fn inner(&self) -> &Value {
        &self.inner
    }

    /// Typed value of a required argument
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .inner
            .get(key)
            .ok_or_else(|| ToolError::invalid_field(key, "missing"))?;
        decode_field(key, value)
    }

    /// Typed value of an optional argument; null counts as missing
    pub fn get_optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.inner.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => decode_field(key, value).map(Some),
        }
    }

    /// Deserialize the whole argument object into a typed request
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.inner.clone())
            .map_err(|e| ToolError::invalid_parameters(e.to_string()))
    }

    pub fn add_required(self, name: &str, param_type: &str, description: &str) -> Self {
        self.with_property(name, property(param_type, description), true)
    }

    pub fn add_optional(
        self,
        name: &str,
        param_type: &str,
        description: &str,
        default_value: Option<Value>,
    ) -> Self {
        let mut schema = property(param_type, description);
        if let Some(default) = default_value {
            schema.insert("default".to_string(), default);
        }
        self.with_property(name, schema, false)
    }

    fn with_property(mut self, name: &str, schema: Map<String, Value>, required: bool) -> Self {
        let mut root = match self.inner {
            Value::Object(root) => root,
            _ => Map::new(),
        };
        root.insert("type".to_string(), json!("object"));

        if let Value::Object(properties) = root
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()))
        {
            properties.insert(name.to_string(), Value::Object(schema));
        }

        if required
            && let Value::Array(names) = root
                .entry("required")
                .or_insert_with(|| Value::Array(Vec::new()))
            && !names.iter().any(|n| n == name)
        {
            names.push(json!(name));
        }

        self.inner = Value::Object(root);
        self
    }
}

fn property(param_type: &str, description: &str) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".to_string(), json!(param_type));
    schema.insert("description".to_string(), json!(description));
    schema
}

fn decode_field<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| ToolError::invalid_field(key, e.to_string()))
}

impl From<Value> for ToolParameters {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl From<ToolParameters> for Value {
    fn from(params: ToolParameters) -> Self {
        params.inner
    }
}

impl std::fmt::Display for ToolParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Who is calling: a session id for log correlation and the calling agent's name
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub session_id: Uuid,
    pub agent: Option<String>,
}

impl ToolContext {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            agent: None,
        }
    }

    pub fn with_session_id(mut self, session_id: Uuid) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn for_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new()
    }
}

/// What a tool hands back to the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub content: String,
    pub content_type: ContentType,
    pub metadata: HashMap<String, Value>,
    pub execution_time: Option<Duration>,
    pub error: Option<String>,
}

impl ToolResult {
    fn new(success: bool, content: String, error: Option<String>) -> Self {
        Self {
            success,
            content,
            content_type: ContentType::Text,
            metadata: HashMap::new(),
            execution_time: None,
            error,
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self::new(true, content.into(), None)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(false, String::new(), Some(message.into()))
    }

    /// Replace the body, keeping the success flag and error message.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = Some(duration);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_error(&self) -> bool {
        !self.success
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.content)?)
    }

    pub fn get_metadata<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.metadata.get(key).and_then(|v| T::deserialize(v).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    Text,
    Json,
}

impl ContentType {
    pub fn to_mime_type(&self) -> &str {
        match self {
            Self::Text => "text/plain",
            Self::Json => "application/json",
        }
    }
}

/// Function declaration handed to the agent layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub category: ToolCategory,
    pub capabilities: Vec<ToolCapability>,
    pub parameter_schema: Value,
}

impl ToolInfo {
    pub fn new(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            category: tool.category(),
            capabilities: tool.capabilities(),
            parameter_schema: tool.parameter_schema(),
        }
    }
}
