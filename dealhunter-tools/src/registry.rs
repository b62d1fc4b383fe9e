use std::{collections::HashMap, sync::Arc, time::Instant};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{
    core::{Tool, ToolCapability, ToolContext, ToolInfo, ToolParameters, ToolResult},
    error::{Result, ToolError},
};

/// Tool registry for managing and executing tools
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Arc<RwLock<HashMap<String, Arc<dyn Tool>>>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool in the registry, replacing any tool with the same name
    pub async fn register_tool(&mut self, tool: Box<dyn Tool>) -> Result<()> {
        let tool_name = tool.name().to_string();
        let mut tools = self.tools.write().await;
        if tools.insert(tool_name.clone(), Arc::from(tool)).is_some() {
            warn!("Tool '{}' was already registered and has been replaced", tool_name);
        }
        Ok(())
    }

    /// Look up a tool; the lock is released before the caller awaits on it
    async fn get_tool(&self, tool_name: &str) -> Result<Arc<dyn Tool>> {
        self.tools
            .read()
            .await
            .get(tool_name)
            .cloned()
            .ok_or_else(|| ToolError::not_found(tool_name))
    }

    /// Execute a tool by name
    pub async fn execute_tool(
        &self,
        tool_name: &str,
        parameters: &Value,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        let tool = self.get_tool(tool_name).await?;

        let tool_params = ToolParameters::new(parameters.clone());
        if let Err(e) = tool.validate_parameters(&tool_params).await {
            return Err(ToolError::invalid_parameters(e.user_message()));
        }

        debug!(
            "Executing tool '{}' for session {}",
            tool_name, context.session_id
        );
        let started = Instant::now();
        let result = tool.execute(tool_params, context.clone()).await?;

        Ok(result.with_execution_time(started.elapsed()))
    }

    /// Execute multiple tools concurrently; results keep the request order
    pub async fn execute_batch(&self, requests: Vec<ToolRequest>) -> Vec<Result<ToolResult>> {
        let handles: Vec<_> = requests
            .into_iter()
            .map(|req| {
                let registry = self.clone();
                tokio::spawn(async move {
                    registry
                        .execute_tool(&req.tool_name, &req.parameters, &req.context)
                        .await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => results.push(Err(ToolError::execution(e.to_string()))),
            }
        }

        results
    }

    /// List all tool names, sorted
    pub async fn list_tools(&self) -> Vec<String> {
        let tools = self.tools.read().await;
        let mut names: Vec<String> = tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Describe every registered tool for function-calling declarations
    pub async fn tool_infos(&self) -> Vec<ToolInfo> {
        let tools = self.tools.read().await;
        let mut infos: Vec<ToolInfo> = tools.values().map(|t| ToolInfo::new(t.as_ref())).collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Find tools by capability
    pub async fn find_tools_by_capability(&self, capability: ToolCapability) -> Vec<String> {
        let tools = self.tools.read().await;
        let mut matching: Vec<String> = tools
            .iter()
            .filter(|(_, tool)| tool.capabilities().contains(&capability))
            .map(|(name, _)| name.clone())
            .collect();
        matching.sort();
        matching
    }

    /// Validate a tool call before execution
    pub async fn validate_tool_call(&self, tool_name: &str, parameters: &Value) -> Result<()> {
        let tool = self.get_tool(tool_name).await?;

        let tool_params = ToolParameters::new(parameters.clone());
        tool.validate_parameters(&tool_params).await
    }
}

/// Tool request for batch execution
#[derive(Debug, Clone)]
pub struct ToolRequest {
    pub tool_name: String,
    pub parameters: Value,
    pub context: ToolContext,
}

impl ToolRequest {
    pub fn new(tool_name: impl Into<String>, parameters: Value, context: ToolContext) -> Self {
        Self {
            tool_name: tool_name.into(),
            parameters,
            context,
        }
    }
}
