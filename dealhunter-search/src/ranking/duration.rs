//! Human-readable flight durations.

use serde_json::Value;

/// Format a minute count as `"{h}h {m}m"`.
pub fn format_minutes(total_minutes: u64) -> String {
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// Format a provider duration value.
///
/// Non-negative integers, integral floats and strings holding one of those
/// format as hours and minutes; fractional floats are truncated. Anything
/// else comes back as its string form, so `"bad"` stays `"bad"`.
pub fn format_duration(total_minutes: &Value) -> String {
    match minutes(total_minutes) {
        Some(minutes) => format_minutes(minutes),
        None => match total_minutes {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}

fn minutes(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_formats_minutes() {
        assert_eq!(format_duration(&json!(125)), "2h 5m");
        assert_eq!(format_duration(&json!(45)), "0h 45m");
        assert_eq!(format_duration(&json!(0)), "0h 0m");
        assert_eq!(format_duration(&json!(600)), "10h 0m");
        assert_eq!(format_duration(&json!(90.0)), "1h 30m");
        assert_eq!(format_duration(&json!(90.7)), "1h 30m");
        assert_eq!(format_duration(&json!("125")), "2h 5m");
    }

    #[test]
    fn test_passes_through_non_numeric() {
        assert_eq!(format_duration(&json!("bad")), "bad");
        assert_eq!(format_duration(&json!("")), "");
        assert_eq!(format_duration(&json!(-30)), "-30");
        assert_eq!(format_duration(&json!(null)), "null");
        assert_eq!(format_duration(&json!([1, 2])), "[1,2]");
    }
}
