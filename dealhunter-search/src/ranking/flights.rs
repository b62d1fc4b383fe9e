//! Flight shortlist: cheapest first.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    coerce::{is_truthy, object_entries, try_parse_number},
    duration::format_duration,
};

/// A flight itinerary in the returned shortlist.
///
/// Fields other than `total_duration_text` are copied from the provider
/// record as-is (null when absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFlight {
    pub price: Value,
    pub total_duration: Value,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_duration_text: Option<String>,
    #[serde(rename = "type")]
    pub itinerary_type: Value,
    pub airline_logo: Value,
    pub flights: Value,
    pub layovers: Value,
    /// The untouched provider record
    pub raw: Value,
}

/// Sort key for a flight. Unreadable prices count as 0.0 and sort first.
pub fn price_key(candidate: &Value) -> f64 {
    candidate
        .get("price")
        .and_then(try_parse_number)
        .unwrap_or(0.0)
}

/// The candidate list: `best_flights` when it is non-empty, else `other_flights`.
fn candidate_list(raw: &Value) -> Option<&Value> {
    ["best_flights", "other_flights"]
        .into_iter()
        .filter_map(|key| raw.get(key))
        .find(|value| is_truthy(value))
}

/// Rank a flight search response by price and keep the cheapest `top_n`.
///
/// The sort is stable, so equal prices keep their response order.
pub fn rank_flights(raw: &Value, top_n: usize) -> Vec<RankedFlight> {
    let mut candidates: Vec<(f64, &Value)> = object_entries(candidate_list(raw))
        .map(|candidate| (price_key(candidate), candidate))
        .collect();

    candidates.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    candidates
        .into_iter()
        .take(top_n)
        .map(|(_, candidate)| project(candidate))
        .collect()
}

fn project(candidate: &Value) -> RankedFlight {
    let field = |key: &str| candidate.get(key).cloned().unwrap_or(Value::Null);
    let total_duration = field("total_duration");

    RankedFlight {
        price: field("price"),
        total_duration_text: (!total_duration.is_null()).then(|| format_duration(&total_duration)),
        total_duration,
        itinerary_type: field("type"),
        airline_logo: field("airline_logo"),
        flights: field("flights"),
        layovers: field("layovers"),
        raw: candidate.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn prices(ranked: &[RankedFlight]) -> Vec<Value> {
        ranked.iter().map(|f| f.price.clone()).collect()
    }

    #[test]
    fn test_sorted_by_price_ascending() {
        let raw = json!({
            "best_flights": [
                {"price": 812}, {"price": 455}, {"price": 1290}, {"price": 630}
            ]
        });
        let ranked = rank_flights(&raw, 3);
        assert_eq!(prices(&ranked), vec![json!(455), json!(630), json!(812)]);
    }

    #[test]
    fn test_unparsable_price_sorts_first() {
        let raw = json!({
            "best_flights": [
                {"price": 300, "id": "a"},
                {"price": "unknown", "id": "b"},
                {"id": "c"},
                {"price": 120, "id": "d"}
            ]
        });
        let ranked = rank_flights(&raw, 4);
        let ids: Vec<_> = ranked.iter().map(|f| f.raw["id"].clone()).collect();
        assert_eq!(ids, vec![json!("b"), json!("c"), json!("d"), json!("a")]);
        assert_eq!(price_key(&json!({"price": "unknown"})), 0.0);
    }

    #[test]
    fn test_string_prices_are_coerced() {
        assert_eq!(price_key(&json!({"price": "$1,200"})), 1200.0);
        assert_eq!(price_key(&json!({"price": 0})), 0.0);
    }

    #[test]
    fn test_falls_back_to_other_flights() {
        let raw = json!({
            "best_flights": [],
            "other_flights": [{"price": 700}, {"price": 650}]
        });
        assert_eq!(prices(&rank_flights(&raw, 3)), vec![json!(650), json!(700)]);

        let raw = json!({"other_flights": [{"price": 99}]});
        assert_eq!(rank_flights(&raw, 3).len(), 1);
    }

    #[test]
    fn test_best_flights_win_when_present() {
        let raw = json!({
            "best_flights": [{"price": 900}],
            "other_flights": [{"price": 100}]
        });
        assert_eq!(prices(&rank_flights(&raw, 3)), vec![json!(900)]);
    }

    #[test]
    fn test_missing_or_unusable_lists_yield_empty() {
        assert!(rank_flights(&json!({}), 3).is_empty());
        assert!(rank_flights(&json!({"best_flights": null, "other_flights": []}), 3).is_empty());
        assert!(rank_flights(&json!({"best_flights": {"price": 1}}), 3).is_empty());
        assert!(rank_flights(&json!("nope"), 3).is_empty());
    }

    #[test]
    fn test_equal_prices_keep_order() {
        let raw = json!({
            "best_flights": [{"price": 200, "n": 1}, {"price": 200, "n": 2}, {"price": 200, "n": 3}]
        });
        let order: Vec<_> = rank_flights(&raw, 3).iter().map(|f| f.raw["n"].clone()).collect();
        assert_eq!(order, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_projection() {
        let itinerary = json!({
            "price": 455,
            "total_duration": 445,
            "type": "Round trip",
            "airline_logo": "https://www.gstatic.com/flights/airline_logos/70px/AF.png",
            "flights": [{
                "departure_airport": {"id": "JFK", "time": "2025-11-19 18:30"},
                "arrival_airport": {"id": "CDG", "time": "2025-11-20 07:55"},
                "airline": "Air France",
                "flight_number": "AF 9",
                "duration": 445
            }],
            "carbon_emissions": {"this_flight": 512000}
        });
        let ranked = rank_flights(&json!({"best_flights": [itinerary.clone()]}), 3);

        assert_eq!(
            ranked,
            vec![RankedFlight {
                price: json!(455),
                total_duration: json!(445),
                total_duration_text: Some("7h 25m".to_string()),
                itinerary_type: json!("Round trip"),
                airline_logo: itinerary["airline_logo"].clone(),
                flights: itinerary["flights"].clone(),
                layovers: Value::Null,
                raw: itinerary,
            }]
        );

        let serialized = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(serialized["type"], json!("Round trip"));
        assert_eq!(serialized["total_duration_text"], json!("7h 25m"));
    }

    #[test]
    fn test_duration_text_omitted_without_duration() {
        let ranked = rank_flights(&json!({"best_flights": [{"price": 10}]}), 3);
        assert_eq!(ranked[0].total_duration_text, None);
        let serialized = serde_json::to_value(&ranked[0]).unwrap();
        assert!(serialized.get("total_duration_text").is_none());
    }
}
