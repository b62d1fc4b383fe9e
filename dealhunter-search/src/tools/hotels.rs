use std::sync::Arc;

use async_trait::async_trait;
use dealhunter_tools::{
    Tool, ToolCapability, ToolCategory, ToolContext, ToolError, ToolParameters, ToolResult,
    validation::ParameterValidator,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use super::{DATE_FORMAT, SearchOutcome};
use crate::{
    client::{Engine, SearchClient, SearchParams, SerpApiClient},
    config::SearchConfig,
    error::SearchError,
    ranking::{RankedHotel, rank_hotels},
};

/// Arguments of the `search_hotels` tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelQuery {
    /// Free text, e.g. "Near the Eiffel Tower in Paris"
    pub query: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub currency: Option<String>,
    pub hl: Option<String>,
    pub gl: Option<String>,
    pub top_n: Option<usize>,
}

impl HotelQuery {
    pub fn new(
        query: impl Into<String>,
        check_in_date: impl Into<String>,
        check_out_date: impl Into<String>,
    ) -> Self {
        Self {
            query: Some(query.into()),
            check_in_date: Some(check_in_date.into()),
            check_out_date: Some(check_out_date.into()),
            ..Self::default()
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    /// Blank optional strings count as not given.
    fn normalized(&self) -> Self {
        Self {
            currency: non_blank(&self.currency),
            hl: non_blank(&self.hl),
            gl: non_blank(&self.gl),
            ..self.clone()
        }
    }

    fn to_search_params(&self, config: &SearchConfig) -> SearchParams {
        let or_default = |value: &Option<String>, default: &str| {
            value.as_deref().unwrap_or(default).trim().to_string()
        };

        SearchParams::new(Engine::GoogleHotels)
            .with("q", self.query.as_deref().unwrap_or_default().trim())
            .with("hl", or_default(&self.hl, &config.hl))
            .with("gl", or_default(&self.gl, &config.gl))
            .with("check_in_date", or_default(&self.check_in_date, ""))
            .with("check_out_date", or_default(&self.check_out_date, ""))
            .with(
                "currency",
                or_default(&self.currency, &config.currency).to_uppercase(),
            )
    }
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn validator() -> ParameterValidator {
    ParameterValidator::new()
        .required(&["query"], "query is required")
        .required(
            &["check_in_date", "check_out_date"],
            "check_in_date and check_out_date are required",
        )
        .date_check("check_in_date", DATE_FORMAT)
        .date_check("check_out_date", DATE_FORMAT)
        .date_order_check("check_in_date", "check_out_date", DATE_FORMAT, true)
        .pattern_check("currency", r"^[A-Za-z]{3}$")
        .range_check("top_n", 1.0, 20.0)
}

/// Searches hotels and returns a rating-first shortlist.
pub struct HotelSearchTool {
    client: Arc<dyn SearchClient>,
    config: SearchConfig,
    validator: ParameterValidator,
}

impl HotelSearchTool {
    pub fn new(client: Arc<dyn SearchClient>, config: SearchConfig) -> Self {
        Self {
            client,
            config,
            validator: validator(),
        }
    }

    /// Build with a SerpAPI client; fails when the config has no API key.
    pub fn from_config(config: SearchConfig) -> Result<Self, SearchError> {
        let client = SerpApiClient::new(&config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Validate, query the provider, rank. Never fails; problems come back
    /// as an error envelope.
    pub async fn search(&self, query: &HotelQuery) -> SearchOutcome<RankedHotel> {
        let query = query.normalized();
        if let Err(err) = self.check(&query) {
            warn!("search_hotels rejected: {}", err);
            return err.into();
        }

        let params = query.to_search_params(&self.config);
        match self.client.search(&params).await {
            Ok(raw) => {
                let hotels = rank_hotels(&raw, query.top_n.unwrap_or(self.config.top_n));
                info!(
                    "search_hotels returned {} hotels for '{}'",
                    hotels.len(),
                    params.get("q").unwrap_or_default()
                );
                SearchOutcome::success(hotels)
            }
            Err(err) => {
                let err = ToolError::from(err);
                warn!("search_hotels failed ({}): {}", err.category(), err);
                err.into()
            }
        }
    }

    fn check(&self, query: &HotelQuery) -> dealhunter_tools::Result<()> {
        let value = serde_json::to_value(query)?;
        self.validator.validate(&value)
    }
}

#[async_trait]
impl Tool for HotelSearchTool {
    fn name(&self) -> &str {
        "search_hotels"
    }

    fn description(&self) -> &str {
        "Search hotels for a destination and stay dates; returns the top-rated options, cheapest first within a rating"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Travel
    }

    fn parameter_schema(&self) -> Value {
        ToolParameters::new_schema()
            .add_required(
                "query",
                "string",
                "Search text, e.g. \"Bali Resorts\" or \"Near the Eiffel Tower in Paris\"",
            )
            .add_required("check_in_date", "string", "Check-in date, YYYY-MM-DD")
            .add_required("check_out_date", "string", "Check-out date, YYYY-MM-DD")
            .add_optional(
                "currency",
                "string",
                "ISO currency code",
                Some(json!(self.config.currency)),
            )
            .add_optional("hl", "string", "Language", Some(json!(self.config.hl)))
            .add_optional("gl", "string", "Geo region", Some(json!(self.config.gl)))
            .add_optional(
                "top_n",
                "integer",
                "Number of hotels to return",
                Some(json!(self.config.top_n)),
            )
            .into()
    }

    fn capabilities(&self) -> Vec<ToolCapability> {
        vec![
            ToolCapability::NetworkRequired,
            ToolCapability::Authenticated,
            ToolCapability::ReadOnly,
        ]
    }

    // Parameter problems are reported through the error envelope instead.
    async fn validate_parameters(&self, _parameters: &ToolParameters) -> dealhunter_tools::Result<()> {
        Ok(())
    }

    async fn execute(
        &self,
        parameters: ToolParameters,
        context: ToolContext,
    ) -> dealhunter_tools::Result<ToolResult> {
        info!(
            "search_hotels invoked for session {} by {}",
            context.session_id,
            context.agent.as_deref().unwrap_or("unknown agent")
        );
        let outcome = match parameters.parse::<HotelQuery>() {
            Ok(query) => self.search(&query).await,
            Err(err) => err.into(),
        };
        outcome.into_tool_result()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::*;
    use crate::client::StaticClient;

    fn fixture() -> Value {
        json!({
            "search_metadata": {"status": "Success"},
            "properties": [
                {"name": "Pullman Paris Tour Eiffel", "overall_rating": 4.2, "extracted_price": 389},
                {"name": "Shangri-La Paris", "overall_rating": 4.7, "rate_per_night": {"extracted_lowest": 1280}},
                {"name": "Hotel Eiffel Seine", "overall_rating": 4.2, "price": "$214"},
                {"name": "Citadines", "overall_rating": 3.9, "extracted_price": 160}
            ],
            "ads": [
                {"name": "Novotel Paris Centre", "overall_rating": 4.2, "extracted_price": 250}
            ]
        })
    }

    fn tool(client: Arc<StaticClient>) -> HotelSearchTool {
        HotelSearchTool::new(client, SearchConfig::new())
    }

    #[tokio::test]
    async fn test_ranked_shortlist() {
        let client = Arc::new(StaticClient::new(fixture()));
        let tool = tool(client.clone());
        let outcome = tool
            .search(&HotelQuery::new(
                "Near the Eiffel Tower in Paris",
                "2025-11-19",
                "2025-11-25",
            ))
            .await;

        let names: Vec<_> = outcome
            .results()
            .unwrap()
            .iter()
            .map(|h| h.name.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                json!("Shangri-La Paris"),
                json!("Hotel Eiffel Seine"),
                json!("Novotel Paris Centre")
            ]
        );
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_request_parameters() {
        let client = Arc::new(StaticClient::new(fixture()));
        let tool = tool(client.clone());
        tool.search(&HotelQuery::new("Bali Resorts", "2025-11-19", "2025-11-25").with_currency("eur"))
            .await;

        let params = client.last_params().await.unwrap();
        assert_eq!(params.engine(), Engine::GoogleHotels);
        assert_eq!(params.get("q"), Some("Bali Resorts"));
        assert_eq!(params.get("currency"), Some("EUR"));
        assert_eq!(params.get("hl"), Some("en"));
        assert_eq!(params.get("gl"), Some("us"));
        assert_eq!(params.get("check_out_date"), Some("2025-11-25"));
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits() {
        let client = Arc::new(StaticClient::new(fixture()));
        let tool = tool(client.clone());

        let outcome = tool
            .search(&HotelQuery::new("", "2025-11-19", "2025-11-25"))
            .await;
        assert_eq!(outcome, SearchOutcome::error("query is required"));

        let outcome = tool
            .search(&HotelQuery {
                query: Some("Paris".into()),
                check_in_date: Some("2025-11-19".into()),
                ..HotelQuery::default()
            })
            .await;
        assert_eq!(
            outcome.error_message(),
            Some("check_in_date and check_out_date are required")
        );
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_date_rules() {
        let client = Arc::new(StaticClient::new(fixture()));
        let tool = tool(client.clone());

        let outcome = tool
            .search(&HotelQuery::new("Paris", "19-11-2025", "2025-11-25"))
            .await;
        assert!(outcome.error_message().unwrap().contains("check_in_date"));

        let outcome = tool
            .search(&HotelQuery::new("Paris", "2025-11-25", "2025-11-19"))
            .await;
        assert_eq!(
            outcome.error_message(),
            Some("check_out_date must be after check_in_date")
        );
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_provider_failure_becomes_error_envelope() {
        let client = Arc::new(StaticClient::failing("Invalid API key."));
        let tool = tool(client.clone());

        let result = tool
            .execute(
                ToolParameters::new(json!({
                    "query": "Paris",
                    "check_in_date": "2025-11-19",
                    "check_out_date": "2025-11-25"
                })),
                ToolContext::new(),
            )
            .await
            .unwrap();

        assert!(result.is_error());
        let envelope = result.json().unwrap();
        assert_eq!(envelope["status"], json!("error"));
        assert!(
            envelope["error_message"]
                .as_str()
                .unwrap()
                .contains("Invalid API key.")
        );
        assert!(logs_contain("search_hotels failed"));
    }

    #[tokio::test]
    async fn test_execute_with_wrong_types() {
        let client = Arc::new(StaticClient::new(fixture()));
        let tool = tool(client.clone());
        let result = tool
            .execute(ToolParameters::new(json!({"query": 42})), ToolContext::new())
            .await
            .unwrap();
        assert!(result.is_error());
        assert_eq!(result.json().unwrap()["status"], json!("error"));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_top_n_override() {
        let client = Arc::new(StaticClient::new(fixture()));
        let tool = tool(client.clone());
        let outcome = tool
            .search(&HotelQuery::new("Paris", "2025-11-19", "2025-11-25").with_top_n(10))
            .await;
        assert_eq!(outcome.results().unwrap().len(), 5);

        let outcome = tool
            .search(&HotelQuery::new("Paris", "2025-11-19", "2025-11-25").with_top_n(0))
            .await;
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_schema_declares_required_fields() {
        let tool = tool(Arc::new(StaticClient::new(json!({}))));
        let schema = tool.parameter_schema();
        assert_eq!(
            schema["required"],
            json!(["query", "check_in_date", "check_out_date"])
        );
        assert_eq!(schema["properties"]["currency"]["default"], json!("USD"));
    }
}
