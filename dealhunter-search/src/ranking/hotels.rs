//! Hotel shortlist: highest rating first, cheapest within a rating.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{FieldPath, FieldChain, as_number, object_entries, try_parse_number};

/// Rating synonyms across provider schema variants.
pub const RATING_FIELDS: FieldChain = FieldChain::new(&[
    FieldPath::Key("overall_rating"),
    FieldPath::Key("overallRating"),
    FieldPath::Key("rating"),
]);

/// Price locations, most specific first.
pub const PRICE_FIELDS: FieldChain = FieldChain::new(&[
    FieldPath::Key("extracted_price"),
    FieldPath::Nested("rate_per_night", "extracted_lowest"),
    FieldPath::Key("extracted_lowest"),
    FieldPath::Key("price"),
    FieldPath::Nested("total_rate", "extracted_lowest"),
]);

const ID_FIELDS: FieldChain = FieldChain::new(&[
    FieldPath::Key("property_token"),
    FieldPath::Key("id"),
    FieldPath::Key("name"),
]);

const NAME_FIELDS: FieldChain = FieldChain::new(&[FieldPath::Key("name"), FieldPath::Key("title")]);

const ADDRESS_FIELDS: FieldChain = FieldChain::new(&[
    FieldPath::Key("link"),
    FieldPath::Key("serpapi_property_details_link"),
]);

/// A hotel in the returned shortlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHotel {
    pub id: Value,
    pub name: Value,
    pub rating: f64,
    pub price: Option<f64>,
    pub address: Value,
    pub amenities: Value,
    /// The untouched provider record
    pub raw: Value,
}

/// Rating of a listing, 0.0 when no rating field holds a number.
pub fn rating_of(candidate: &Value) -> f64 {
    RATING_FIELDS.first_number(candidate, as_number).unwrap_or(0.0)
}

/// Numeric nightly price of a listing, if any price field can be read.
pub fn price_of(candidate: &Value) -> Option<f64> {
    PRICE_FIELDS.first_number(candidate, try_parse_number)
}

struct Scored<'a> {
    candidate: &'a Value,
    rating: f64,
    price: Option<f64>,
}

impl Scored<'_> {
    fn price_key(&self) -> f64 {
        self.price.unwrap_or(f64::INFINITY)
    }
}

/// Rank the `properties` and `ads` of a hotel search response and keep the best `top_n`.
///
/// Sorting is by rating descending, then price ascending with unknown prices
/// last. The sort is stable, so full ties keep their response order
/// (properties before ads). Entries that are not JSON objects are ignored.
pub fn rank_hotels(raw: &Value, top_n: usize) -> Vec<RankedHotel> {
    let mut scored: Vec<Scored<'_>> = object_entries(raw.get("properties"))
        .chain(object_entries(raw.get("ads")))
        .map(|candidate| Scored {
            candidate,
            rating: rating_of(candidate),
            price: price_of(candidate),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                a.price_key()
                    .partial_cmp(&b.price_key())
                    .unwrap_or(Ordering::Equal)
            })
    });

    scored.into_iter().take(top_n).map(project).collect()
}

fn project(scored: Scored<'_>) -> RankedHotel {
    let candidate = scored.candidate;
    let field = |chain: FieldChain| chain.first_truthy(candidate).cloned().unwrap_or(Value::Null);

    RankedHotel {
        id: field(ID_FIELDS),
        name: field(NAME_FIELDS),
        rating: scored.rating,
        price: scored.price,
        address: field(ADDRESS_FIELDS),
        amenities: candidate.get("amenities").cloned().unwrap_or(Value::Null),
        raw: candidate.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn names(ranked: &[RankedHotel]) -> Vec<&str> {
        ranked.iter().map(|h| h.name.as_str().unwrap_or("?")).collect()
    }

    #[test]
    fn test_distinct_ratings_sort_descending() {
        let raw = json!({
            "properties": [
                {"name": "B", "overall_rating": 4.1, "extracted_price": 120},
                {"name": "A", "overall_rating": 4.8, "extracted_price": 300},
                {"name": "D", "overall_rating": 3.2, "extracted_price": 60},
                {"name": "C", "overall_rating": 3.9, "extracted_price": 80}
            ]
        });
        let ranked = rank_hotels(&raw, 3);
        assert_eq!(names(&ranked), vec!["A", "B", "C"]);
        assert!(ranked.windows(2).all(|w| w[0].rating > w[1].rating));
    }

    #[test]
    fn test_equal_rating_cheapest_first_unknown_price_last() {
        let raw = json!({
            "properties": [
                {"name": "no-price", "overall_rating": 4.5},
                {"name": "pricey", "overall_rating": 4.5, "extracted_price": 410},
                {"name": "garbled", "overall_rating": 4.5, "price": "call us"},
                {"name": "cheap", "overall_rating": 4.5, "rate_per_night": {"extracted_lowest": 99}}
            ]
        });
        let ranked = rank_hotels(&raw, 10);
        assert_eq!(names(&ranked), vec!["cheap", "pricey", "no-price", "garbled"]);
        assert_eq!(ranked[2].price, None);
        assert_eq!(ranked[3].price, None);
    }

    #[test]
    fn test_missing_rating_defaults_to_zero() {
        let raw = json!({
            "properties": [
                {"name": "unrated", "extracted_price": 10},
                {"name": "rated", "rating": "3.0", "extracted_price": 500}
            ]
        });
        let ranked = rank_hotels(&raw, 3);
        assert_eq!(names(&ranked), vec!["rated", "unrated"]);
        assert_eq!(ranked[1].rating, 0.0);
    }

    #[test]
    fn test_rating_synonyms_in_order() {
        assert_eq!(rating_of(&json!({"overall_rating": 4.0, "rating": 2.0})), 4.0);
        assert_eq!(rating_of(&json!({"overallRating": "3.5"})), 3.5);
        assert_eq!(rating_of(&json!({"overall_rating": "4.5/5", "rating": 4.4})), 4.4);
        assert_eq!(rating_of(&json!({"overall_rating": null})), 0.0);
    }

    #[test]
    fn test_price_field_order() {
        assert_eq!(
            price_of(&json!({"extracted_price": 150, "rate_per_night": {"extracted_lowest": 90}})),
            Some(150.0)
        );
        assert_eq!(
            price_of(&json!({"rate_per_night": {"extracted_lowest": 90}, "extracted_lowest": 80})),
            Some(90.0)
        );
        assert_eq!(price_of(&json!({"extracted_lowest": "85", "price": 70})), Some(85.0));
        assert_eq!(price_of(&json!({"price": "$1,050"})), Some(1050.0));
        assert_eq!(
            price_of(&json!({"total_rate": {"extracted_lowest": 640}})),
            Some(640.0)
        );
        assert_eq!(
            price_of(&json!({"extracted_price": "n/a", "total_rate": {"extracted_lowest": 640}})),
            Some(640.0)
        );
        assert_eq!(price_of(&json!({"rate_per_night": {"lowest": "$90"}})), None);
    }

    #[test]
    fn test_properties_and_ads_are_pooled() {
        let raw = json!({
            "properties": [{"name": "organic", "overall_rating": 4.0, "extracted_price": 200}],
            "ads": [{"title": "sponsored", "overall_rating": 4.6, "extracted_price": 220}]
        });
        let ranked = rank_hotels(&raw, 3);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, json!("sponsored"));
    }

    #[test]
    fn test_full_ties_keep_input_order() {
        let raw = json!({
            "properties": [
                {"name": "first", "overall_rating": 4.0, "extracted_price": 100},
                {"name": "second", "overall_rating": 4.0, "extracted_price": 100}
            ],
            "ads": [{"name": "third", "overall_rating": 4.0, "extracted_price": 100}]
        });
        assert_eq!(names(&rank_hotels(&raw, 3)), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_or_unusable_lists() {
        assert!(rank_hotels(&json!({}), 3).is_empty());
        assert!(rank_hotels(&json!({"properties": [], "ads": []}), 3).is_empty());
        assert!(rank_hotels(&json!({"properties": "oops", "ads": null}), 3).is_empty());
        assert!(rank_hotels(&json!([1, 2, 3]), 3).is_empty());
        assert!(rank_hotels(&json!({"properties": [{"name": "x"}]}), 0).is_empty());
    }

    #[test]
    fn test_projection() {
        let listing = json!({
            "property_token": "ChkI-token",
            "name": "Hotel Lutetia",
            "overall_rating": 4.7,
            "rate_per_night": {"lowest": "$512", "extracted_lowest": 512},
            "serpapi_property_details_link": "https://serpapi.com/details",
            "amenities": ["Free Wi-Fi", "Spa"]
        });
        let raw = json!({"properties": [listing.clone()]});
        let ranked = rank_hotels(&raw, 3);

        assert_eq!(
            ranked,
            vec![RankedHotel {
                id: json!("ChkI-token"),
                name: json!("Hotel Lutetia"),
                rating: 4.7,
                price: Some(512.0),
                address: json!("https://serpapi.com/details"),
                amenities: json!(["Free Wi-Fi", "Spa"]),
                raw: listing,
            }]
        );
    }

    #[test]
    fn test_projection_fallbacks() {
        let raw = json!({"ads": [{"title": "Ad Hotel", "id": "", "link": "https://ads.example"}]});
        let hotel = &rank_hotels(&raw, 3)[0];
        assert_eq!(hotel.id, Value::Null);
        assert_eq!(hotel.name, json!("Ad Hotel"));
        assert_eq!(hotel.address, json!("https://ads.example"));
        assert_eq!(hotel.amenities, Value::Null);

        let serialized = serde_json::to_value(hotel).unwrap();
        assert_eq!(serialized["price"], Value::Null);
        assert_eq!(serialized["rating"], json!(0.0));
    }
}
