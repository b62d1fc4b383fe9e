//! Combined flight and hotel lookup for one trip.

use std::sync::Arc;

use dealhunter_tools::{ToolContext, ToolError, ToolRegistry, ToolRequest, ToolResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    client::SearchClient,
    config::SearchConfig,
    tools::{FlightQuery, FlightSearchTool, HotelQuery, HotelSearchTool, SearchOutcome},
};

/// Register both search tools on `registry`, sharing one client.
pub async fn register_search_tools(
    registry: &mut ToolRegistry,
    client: Arc<dyn SearchClient>,
    config: &SearchConfig,
) -> dealhunter_tools::Result<()> {
    registry
        .register_tool(Box::new(FlightSearchTool::new(client.clone(), config.clone())))
        .await?;
    registry
        .register_tool(Box::new(HotelSearchTool::new(client, config.clone())))
        .await
}

/// A trip to look up: one flight search and one hotel search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelRequest {
    pub flight: FlightQuery,
    pub hotel: HotelQuery,
}

/// Both envelopes, exactly as the individual tools returned them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelOptions {
    pub flights: Value,
    pub hotels: Value,
}

impl TravelOptions {
    pub fn all_succeeded(&self) -> bool {
        self.flights["status"] == "success" && self.hotels["status"] == "success"
    }
}

/// Run the flight and hotel searches concurrently through `registry`.
///
/// One side failing does not affect the other; each failure shows up as an
/// error envelope in its own slot.
pub async fn search_travel_options(
    registry: &ToolRegistry,
    request: &TravelRequest,
    context: &ToolContext,
) -> dealhunter_tools::Result<TravelOptions> {
    let requests = vec![
        ToolRequest::new(
            "search_flight",
            serde_json::to_value(&request.flight)?,
            context.clone(),
        ),
        ToolRequest::new(
            "search_hotels",
            serde_json::to_value(&request.hotel)?,
            context.clone(),
        ),
    ];

    info!("Searching travel options for session {}", context.session_id);
    let mut results = registry.execute_batch(requests).await.into_iter();
    let flights = envelope("search_flight", results.next());
    let hotels = envelope("search_hotels", results.next());

    Ok(TravelOptions { flights, hotels })
}

fn envelope(tool: &str, result: Option<dealhunter_tools::Result<ToolResult>>) -> Value {
    let parsed = result
        .unwrap_or_else(|| Err(ToolError::internal(format!("no result for {tool}"))))
        .and_then(|result| result.json());

    match parsed {
        Ok(value) => value,
        Err(err) => {
            warn!("{} produced no envelope: {}", tool, err);
            serde_json::to_value(SearchOutcome::<Value>::from(err))
                .unwrap_or(Value::Null)
        }
    }
}
