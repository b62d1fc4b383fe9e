use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{Result, ToolError};

/// Validation rules for tool parameters.
///
/// Every rule except `Required` ignores fields that are absent or null, so
/// optional parameters only get checked when the caller supplies them.
#[derive(Debug, Clone)]
pub enum ValidationRule {
    /// All listed fields must be present and non-blank; fails with `message`
    Required { fields: Vec<String>, message: String },
    /// Field must be of specific type
    FieldType(String, ValueType),
    /// Numeric field must be within range
    Range(String, f64, f64),
    /// String field must match pattern
    Pattern(String, String),
    /// String field must be a calendar date in the given `chrono` format
    Date(String, String),
    /// Two date fields must be ordered; `strict` forbids equal dates
    DateOrder {
        earlier: String,
        later: String,
        format: String,
        strict: bool,
    },
    /// Custom validation function
    Custom(String, fn(&Value) -> bool),
}

impl ValidationRule {
    /// Create a required-fields rule with a caller-facing message
    pub fn required(fields: &[&str], message: &str) -> Self {
        ValidationRule::Required {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            message: message.to_string(),
        }
    }

    /// Create field type rule
    pub fn field_type(field: &str, value_type: ValueType) -> Self {
        ValidationRule::FieldType(field.to_string(), value_type)
    }

    /// Create range validation rule
    pub fn range(field: &str, min: f64, max: f64) -> Self {
        ValidationRule::Range(field.to_string(), min, max)
    }

    /// Create pattern validation rule
    pub fn pattern(field: &str, pattern: &str) -> Self {
        ValidationRule::Pattern(field.to_string(), pattern.to_string())
    }

    /// Create date format rule
    pub fn date(field: &str, format: &str) -> Self {
        ValidationRule::Date(field.to_string(), format.to_string())
    }

    /// Create date ordering rule
    pub fn date_order(earlier: &str, later: &str, format: &str, strict: bool) -> Self {
        ValidationRule::DateOrder {
            earlier: earlier.to_string(),
            later: later.to_string(),
            format: format.to_string(),
            strict,
        }
    }

    /// Create custom validation rule
    pub fn custom(field: &str, validator: fn(&Value) -> bool) -> Self {
        ValidationRule::Custom(field.to_string(), validator)
    }

    /// Validate a value against this rule
    pub fn validate(&self, data: &Value) -> Result<()> {
        match self {
            ValidationRule::Required { fields, message } => {
                if fields.iter().any(|field| is_blank(data.get(field))) {
                    return Err(ToolError::validation(message.clone()));
                }
                Ok(())
            }
            ValidationRule::FieldType(field, expected_type) => {
                if let Some(value) = present(data, field) {
                    let actual_type = ValueType::from_json_value(value);
                    if actual_type != *expected_type {
                        return Err(ToolError::validation(format!(
                            "Field '{field}' expected type {}, got {}",
                            expected_type.as_str(),
                            actual_type.as_str()
                        )));
                    }
                }
                Ok(())
            }
            ValidationRule::Range(field, min, max) => {
                if let Some(value) = present(data, field) {
                    let Some(num) = value.as_f64() else {
                        return Err(ToolError::validation(format!(
                            "Field '{field}' is not a number"
                        )));
                    };
                    if num < *min || num > *max {
                        return Err(ToolError::validation(format!(
                            "Field '{field}' value {num} is outside range [{min}, {max}]"
                        )));
                    }
                }
                Ok(())
            }
            ValidationRule::Pattern(field, pattern) => {
                if let Some(value) = present(data, field) {
                    let string_val = as_string(field, value)?;
                    let regex = regex::Regex::new(pattern).map_err(|e| {
                        ToolError::internal(format!("Invalid regex pattern '{pattern}': {e}"))
                    })?;

                    if !regex.is_match(string_val) {
                        return Err(ToolError::validation(format!(
                            "Field '{field}' value '{string_val}' does not match pattern '{pattern}'"
                        )));
                    }
                }
                Ok(())
            }
            ValidationRule::Date(field, format) => {
                if let Some(value) = present(data, field) {
                    parse_date(field, value, format)?;
                }
                Ok(())
            }
            ValidationRule::DateOrder {
                earlier,
                later,
                format,
                strict,
            } => {
                let (Some(first), Some(second)) = (present(data, earlier), present(data, later))
                else {
                    return Ok(());
                };
                let first = parse_date(earlier, first, format)?;
                let second = parse_date(later, second, format)?;

                if *strict && second <= first {
                    return Err(ToolError::validation(format!(
                        "{later} must be after {earlier}"
                    )));
                }
                if second < first {
                    return Err(ToolError::validation(format!(
                        "{later} must not be before {earlier}"
                    )));
                }
                Ok(())
            }
            ValidationRule::Custom(field, validator) => {
                if let Some(value) = present(data, field)
                    && !validator(value)
                {
                    return Err(ToolError::validation(format!(
                        "Field '{field}' has an unsupported value {value}"
                    )));
                }
                Ok(())
            }
        }
    }
}

fn present<'a>(data: &'a Value, field: &str) -> Option<&'a Value> {
    data.get(field).filter(|v| !v.is_null())
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn as_string<'a>(field: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| ToolError::validation(format!("Field '{field}' is not a string")))
}

fn parse_date(field: &str, value: &Value, format: &str) -> Result<NaiveDate> {
    let raw = as_string(field, value)?;
    NaiveDate::parse_from_str(raw.trim(), format).map_err(|_| {
        ToolError::validation(format!(
            "Field '{field}' value '{raw}' is not a valid date ({format})"
        ))
    })
}

/// Value types for validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

impl ValueType {
    /// Determine value type from JSON value
    pub fn from_json_value(value: &Value) -> Self {
        match value {
            Value::String(_) => ValueType::String,
            Value::Number(_) => ValueType::Number,
            Value::Bool(_) => ValueType::Boolean,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
            Value::Null => ValueType::Null,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::Null => "null",
        }
    }
}

/// Ordered rule set for tool inputs; the first failing rule wins
#[derive(Debug, Clone, Default)]
pub struct ParameterValidator {
    rules: Vec<ValidationRule>,
}

impl ParameterValidator {
    /// Create new parameter validator
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Require that every field in `fields` is present and non-blank
    pub fn required(mut self, fields: &[&str], message: &str) -> Self {
        self.rules.push(ValidationRule::required(fields, message));
        self
    }

    /// Add optional field type validation
    pub fn optional_field(mut self, field: &str, value_type: ValueType) -> Self {
        self.rules
            .push(ValidationRule::field_type(field, value_type));
        self
    }

    /// Add range validation
    pub fn range_check(mut self, field: &str, min: f64, max: f64) -> Self {
        self.rules.push(ValidationRule::range(field, min, max));
        self
    }

    /// Add pattern validation
    pub fn pattern_check(mut self, field: &str, pattern: &str) -> Self {
        self.rules.push(ValidationRule::pattern(field, pattern));
        self
    }

    /// Add date format validation
    pub fn date_check(mut self, field: &str, format: &str) -> Self {
        self.rules.push(ValidationRule::date(field, format));
        self
    }

    /// Add date ordering validation
    pub fn date_order_check(mut self, earlier: &str, later: &str, format: &str, strict: bool) -> Self {
        self.rules
            .push(ValidationRule::date_order(earlier, later, format, strict));
        self
    }

    /// Add custom validation
    pub fn custom_check(mut self, field: &str, validator: fn(&Value) -> bool) -> Self {
        self.rules.push(ValidationRule::custom(field, validator));
        self
    }

    /// Validate data against all rules, stopping at the first failure
    pub fn validate(&self, data: &Value) -> Result<()> {
        for rule in &self.rules {
            rule.validate(data)?;
        }
        Ok(())
    }

    /// Validate and collect all errors
    pub fn validate_all(&self, data: &Value) -> Result<()> {
        let errors: Vec<String> = self
            .rules
            .iter()
            .filter_map(|rule| rule.validate(data).err())
            .map(|e| e.user_message())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ToolError::validation(errors.join("; ")))
        }
    }
}
