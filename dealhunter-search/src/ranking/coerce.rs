//! Defensive field access and numeric coercion over untyped provider JSON.

use serde_json::Value;

/// One way of reaching a logical field inside a candidate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    /// A top-level key
    Key(&'static str),
    /// A key inside a nested object
    Nested(&'static str, &'static str),
}

impl FieldPath {
    /// Resolve the path, treating JSON null as absent.
    pub fn lookup<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        let value = match *self {
            FieldPath::Key(key) => record.get(key),
            FieldPath::Nested(outer, inner) => record.get(outer)?.get(inner),
        };
        value.filter(|v| !v.is_null())
    }
}

/// An ordered table of synonymous field locations for one logical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldChain {
    paths: &'static [FieldPath],
}

impl FieldChain {
    pub const fn new(paths: &'static [FieldPath]) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &'static [FieldPath] {
        self.paths
    }

    /// First location that resolves to a truthy value.
    pub fn first_truthy<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.paths
            .iter()
            .filter_map(|path| path.lookup(record))
            .find(|value| is_truthy(value))
    }

    /// First location whose value survives `coerce`.
    pub fn first_number(&self, record: &Value, coerce: fn(&Value) -> Option<f64>) -> Option<f64> {
        self.paths
            .iter()
            .filter_map(|path| path.lookup(record))
            .find_map(coerce)
    }
}

/// Direct numeric cast: numbers, booleans and strings that parse whole.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => parse_finite(s),
        _ => None,
    }
}

/// Direct cast, then retry on a string with everything but digits and `.` removed.
///
/// `"$1,234.50"` becomes 1234.5, `"1.2.3"` and `"free"` become `None`.
pub fn try_parse_number(value: &Value) -> Option<f64> {
    as_number(value).or_else(|| match value {
        Value::String(s) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
            parse_finite(&digits)
        }
        _ => None,
    })
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Whether a value would count as present in an "or" chain: not null,
/// `false`, zero, or an empty string/array/object.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Object entries of a list-valued field; anything else yields nothing.
pub fn object_entries<'a>(value: Option<&'a Value>) -> impl Iterator<Item = &'a Value> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|entry| entry.is_object())
}
