use std::sync::Arc;

use async_trait::async_trait;
use dealhunter_tools::{
    Tool, ToolCapability, ToolCategory, ToolContext, ToolError, ToolParameters, ToolResult,
    validation::ParameterValidator,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use super::{DATE_FORMAT, SearchOutcome, hotels::non_blank};
use crate::{
    client::{Engine, SearchClient, SearchParams, SerpApiClient},
    config::SearchConfig,
    error::SearchError,
    ranking::{RankedFlight, rank_flights},
};

/// One IATA code, or several joined by commas.
const AIRPORT_PATTERN: &str = r"^[A-Za-z]{3}(,[A-Za-z]{3})*$";

/// Provider codes for the accepted travel classes.
pub fn travel_class_code(travel_class: &str) -> Option<u8> {
    let normalized = travel_class
        .trim()
        .to_lowercase()
        .replace([' ', '-'], "_");
    match normalized.as_str() {
        "economy" => Some(1),
        "premium_economy" | "premium" => Some(2),
        "business" => Some(3),
        "first" => Some(4),
        _ => None,
    }
}

/// Arguments of the `search_flight` tool.
///
/// Field names on the wire follow the agent-facing camelCase contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightQuery {
    #[serde(rename = "originLocationCode")]
    pub origin: Option<String>,
    #[serde(rename = "destinationLocationCode")]
    pub destination: Option<String>,
    #[serde(rename = "departureDate")]
    pub departure_date: Option<String>,
    /// Absent for one-way trips
    #[serde(rename = "returnDate")]
    pub return_date: Option<String>,
    pub adults: Option<u32>,
    #[serde(rename = "travelClass")]
    pub travel_class: Option<String>,
    pub currency: Option<String>,
    pub hl: Option<String>,
    pub gl: Option<String>,
    pub top_n: Option<usize>,
}

impl FlightQuery {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: impl Into<String>,
    ) -> Self {
        Self {
            origin: Some(origin.into()),
            destination: Some(destination.into()),
            departure_date: Some(departure_date.into()),
            ..Self::default()
        }
    }

    pub fn with_return_date(mut self, return_date: impl Into<String>) -> Self {
        self.return_date = Some(return_date.into());
        self
    }

    pub fn with_adults(mut self, adults: u32) -> Self {
        self.adults = Some(adults);
        self
    }

    pub fn with_travel_class(mut self, travel_class: impl Into<String>) -> Self {
        self.travel_class = Some(travel_class.into());
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    /// A non-blank return date makes the trip a round trip.
    pub fn is_round_trip(&self) -> bool {
        non_blank(&self.return_date).is_some()
    }

    fn normalized(&self) -> Self {
        let trimmed = |value: &Option<String>| value.as_deref().map(|s| s.trim().to_string());
        Self {
            origin: trimmed(&self.origin),
            destination: trimmed(&self.destination),
            return_date: non_blank(&self.return_date),
            travel_class: non_blank(&self.travel_class),
            currency: non_blank(&self.currency),
            hl: non_blank(&self.hl),
            gl: non_blank(&self.gl),
            ..self.clone()
        }
    }

    fn to_search_params(&self, config: &SearchConfig) -> SearchParams {
        let upper = |value: &Option<String>| value.as_deref().unwrap_or_default().to_uppercase();
        let trip_type = if self.is_round_trip() { 1 } else { 2 };

        SearchParams::new(Engine::GoogleFlights)
            .with("departure_id", upper(&self.origin))
            .with("arrival_id", upper(&self.destination))
            .with(
                "outbound_date",
                self.departure_date.as_deref().unwrap_or_default().trim(),
            )
            .with_optional("return_date", self.return_date.as_deref().map(str::trim))
            .with("type", trip_type)
            .with("adults", self.adults.unwrap_or(1))
            .with_optional(
                "travel_class",
                self.travel_class.as_deref().and_then(travel_class_code),
            )
            .with(
                "currency",
                self.currency
                    .as_deref()
                    .unwrap_or(&config.currency)
                    .to_uppercase(),
            )
            .with("hl", self.hl.as_deref().unwrap_or(&config.hl))
            .with("gl", self.gl.as_deref().unwrap_or(&config.gl))
    }
}

fn validator() -> ParameterValidator {
    ParameterValidator::new()
        .required(
            &["originLocationCode", "destinationLocationCode", "departureDate"],
            "originLocationCode, destinationLocationCode and departureDate are required",
        )
        .pattern_check("originLocationCode", AIRPORT_PATTERN)
        .pattern_check("destinationLocationCode", AIRPORT_PATTERN)
        .date_check("departureDate", DATE_FORMAT)
        .date_check("returnDate", DATE_FORMAT)
        .date_order_check("departureDate", "returnDate", DATE_FORMAT, false)
        .range_check("adults", 1.0, 9.0)
        .custom_check("travelClass", |value| {
            value.as_str().and_then(travel_class_code).is_some()
        })
        .pattern_check("currency", r"^[A-Za-z]{3}$")
        .range_check("top_n", 1.0, 20.0)
}

/// Searches flights and returns the cheapest itineraries.
pub struct FlightSearchTool {
    client: Arc<dyn SearchClient>,
    config: SearchConfig,
    validator: ParameterValidator,
}

impl FlightSearchTool {
    pub fn new(client: Arc<dyn SearchClient>, config: SearchConfig) -> Self {
        Self {
            client,
            config,
            validator: validator(),
        }
    }

    pub fn from_config(config: SearchConfig) -> Result<Self, SearchError> {
        let client = SerpApiClient::new(&config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    pub async fn search(&self, query: &FlightQuery) -> SearchOutcome<RankedFlight> {
        let query = query.normalized();
        if let Err(err) = serde_json::to_value(&query)
            .map_err(ToolError::from)
            .and_then(|value| self.validator.validate(&value))
        {
            warn!("search_flight rejected: {}", err);
            return err.into();
        }

        let params = query.to_search_params(&self.config);
        match self.client.search(&params).await {
            Ok(raw) => {
                let flights = rank_flights(&raw, query.top_n.unwrap_or(self.config.top_n));
                info!(
                    "search_flight returned {} itineraries for {} -> {}",
                    flights.len(),
                    params.get("departure_id").unwrap_or_default(),
                    params.get("arrival_id").unwrap_or_default()
                );
                SearchOutcome::success(flights)
            }
            Err(err) => {
                let err = ToolError::from(err);
                warn!("search_flight failed ({}): {}", err.category(), err);
                err.into()
            }
        }
    }
}

#[async_trait]
impl Tool for FlightSearchTool {
    fn name(&self) -> &str {
        "search_flight"
    }

    fn description(&self) -> &str {
        "Search flights between two airports; returns the cheapest itineraries"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Travel
    }

    fn parameter_schema(&self) -> Value {
        ToolParameters::new_schema()
            .add_required(
                "originLocationCode",
                "string",
                "Departure airport IATA code, e.g. JFK",
            )
            .add_required(
                "destinationLocationCode",
                "string",
                "Arrival airport IATA code, e.g. CDG",
            )
            .add_required("departureDate", "string", "Outbound date, YYYY-MM-DD")
            .add_optional(
                "returnDate",
                "string",
                "Return date, YYYY-MM-DD; omit for one-way",
                None,
            )
            .add_optional("adults", "integer", "Number of adult passengers", Some(json!(1)))
            .add_optional(
                "travelClass",
                "string",
                "economy, premium_economy, business or first",
                Some(json!("economy")),
            )
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
                "Number of itineraries to return",
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

    async fn validate_parameters(&self, _parameters: &ToolParameters) -> dealhunter_tools::Result<()> {
        Ok(())
    }

    async fn execute(
        &self,
        parameters: ToolParameters,
        context: ToolContext,
    ) -> dealhunter_tools::Result<ToolResult> {
        info!(
            "search_flight invoked for session {} by {}",
            context.session_id,
            context.agent.as_deref().unwrap_or("unknown agent")
        );
        let outcome = match parameters.parse::<FlightQuery>() {
            Ok(query) => self.search(&query).await,
            Err(err) => err.into(),
        };
        outcome.into_tool_result()
    }
}
