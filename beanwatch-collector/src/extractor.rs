//! Conversion of raw attribute values into numbers.

use beanwatch_types::ManagedAttribute;
use serde_json::Value;

use crate::ExtractError;

/// Converts a raw attribute reading into a numeric value.
pub trait AttributeValueExtractor: Send + Sync {
    fn extract(&self, raw: &Value, attribute: &ManagedAttribute) -> Result<f64, ExtractError>;
}

/// Default extractor driven by the attribute's declared data type.
///
/// | data type | accepted value |
/// |---|---|
/// | `int`, `long`, `short`, `byte`, `float`, `double`, `number` | JSON number or numeric string |
/// | `boolean` | `true` → 1, `false` → 0 |
/// | `string` | string parsed as a number |
/// | `composite:<key>` | object member `<key>`, converted as a number |
///
/// Type names are case-insensitive; `java.lang.` prefixes are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericExtractor;

impl NumericExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl AttributeValueExtractor for NumericExtractor {
    fn extract(&self, raw: &Value, attribute: &ManagedAttribute) -> Result<f64, ExtractError> {
        if raw.is_null() {
            return Err(ExtractError::Absent);
        }

        let data_type = attribute.data_type.trim();
        if let Some(key) = data_type.strip_prefix("composite:") {
            let object = raw
                .as_object()
                .ok_or_else(|| ExtractError::Unsupported(data_type.to_string()))?;
            let member = object
                .get(key)
                .ok_or_else(|| ExtractError::InvalidKey(key.to_string()))?;
            if member.is_null() {
                return Err(ExtractError::Absent);
            }
            return number(member);
        }

        let lowered = data_type.to_ascii_lowercase();
        match lowered.trim_start_matches("java.lang.") {
            "int" | "integer" | "long" | "short" | "byte" | "float" | "double" | "number" => {
                number(raw)
            }
            "boolean" => match raw {
                Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" => Ok(1.0),
                    "false" => Ok(0.0),
                    _ => Err(ExtractError::NotNumeric(s.clone())),
                },
                other => Err(ExtractError::NotNumeric(other.to_string())),
            },
            "string" => match raw {
                Value::String(s) => parse(s),
                other => Err(ExtractError::NotNumeric(other.to_string())),
            },
            _ => Err(ExtractError::Unsupported(data_type.to_string())),
        }
    }
}

fn number(value: &Value) -> Result<f64, ExtractError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ExtractError::NotNumeric(n.to_string())),
        Value::String(s) => parse(s),
        other => Err(ExtractError::NotNumeric(other.to_string())),
    }
}

fn parse(s: &str) -> Result<f64, ExtractError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ExtractError::NotNumeric(s.to_string()))
}
