//! Dealhunter Search - hotel and flight search tools for travel agents
//!
//! Two agent-callable tools sit on top of a search provider (SerpAPI's
//! Google Hotels and Google Flights engines):
//!
//! - `search_hotels` returns the highest rated hotels, cheapest first among equals
//! - `search_flight` returns the cheapest itineraries
//!
//! Ranking lives in [`ranking`] as pure functions over the raw provider JSON,
//! so it can be used and tested without any network access.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use dealhunter_search::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> dealhunter_tools::Result<()> {
//!     let client = Arc::new(StaticClient::new(json!({
//!         "properties": [
//!             {"name": "Hotel A", "overall_rating": 4.1, "extracted_price": 180},
//!             {"name": "Hotel B", "overall_rating": 4.6, "extracted_price": 240}
//!         ]
//!     })));
//!
//!     let mut registry = ToolRegistry::new();
//!     register_search_tools(&mut registry, client, &SearchConfig::new()).await?;
//!
//!     let params = json!({
//!         "query": "Bali Resorts",
//!         "check_in_date": "2025-11-19",
//!         "check_out_date": "2025-11-25"
//!     });
//!     let result = registry
//!         .execute_tool("search_hotels", &params, &ToolContext::new())
//!         .await?;
//!
//!     let envelope = result.json()?;
//!     assert_eq!(envelope["status"], "success");
//!     assert_eq!(envelope["results"][0]["name"], "Hotel B");
//!     Ok(())
//! }
//! ```

/// Search provider clients.
pub mod client;
/// Provider configuration.
pub mod config;
/// Error types for the search layer.
pub mod error;
pub mod ranking;
pub mod tools;
pub mod travel;

pub use client::{Engine, SearchClient, SearchParams, SerpApiClient, StaticClient};
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use ranking::{
    DEFAULT_TOP_N, RankedFlight, RankedHotel, format_duration, rank_flights, rank_hotels,
    try_parse_number,
};
pub use tools::{FlightQuery, FlightSearchTool, HotelQuery, HotelSearchTool, SearchOutcome};
pub use travel::{TravelOptions, TravelRequest, register_search_tools, search_travel_options};

/// Prelude module for convenient imports
pub mod prelude {
    pub use dealhunter_tools::{Tool, ToolContext, ToolRegistry, ToolResult};
    pub use serde_json::{Value, json};

    pub use crate::{
        client::{SearchClient, SerpApiClient, StaticClient},
        config::SearchConfig,
        error::SearchError,
        ranking::{RankedFlight, RankedHotel, rank_flights, rank_hotels},
        tools::{FlightQuery, FlightSearchTool, HotelQuery, HotelSearchTool, SearchOutcome},
        travel::{TravelOptions, TravelRequest, register_search_tools, search_travel_options},
    };
}
