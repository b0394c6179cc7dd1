//! Category attribute schemas.
//!
//! A category may declare a schema mapping attribute names to types; item
//! attributes are checked against the declarations on create and update.
//! Undeclared attributes are free-form, and a declared attribute may be
//! absent. Unrecognized type names degrade to [`AttributeType::Unknown`],
//! which accepts any value.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::CoreError;

/// Declared type of a category attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Number,
    Date,
    Boolean,
    Unknown,
}

impl AttributeType {
    pub fn parse(s: &str) -> Self {
        match s {
            "string" => AttributeType::String,
            "number" => AttributeType::Number,
            "date" => AttributeType::Date,
            "boolean" => AttributeType::Boolean,
            _ => AttributeType::Unknown,
        }
    }

    /// Whether `value` conforms to this type. Dates are ISO `YYYY-MM-DD`
    /// strings.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Number => value.is_number(),
            AttributeType::Boolean => value.is_boolean(),
            AttributeType::Date => value
                .as_str()
                .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
            AttributeType::Unknown => true,
        }
    }
}

/// Validate item `attributes` against a category `schema`.
///
/// Both arguments are the JSONB maps as stored; a non-object schema is
/// treated as empty rather than rejected, since categories without a schema
/// are common.
pub fn validate_attributes(schema: &Value, attributes: &Value) -> Result<(), CoreError> {
    let Some(schema) = schema.as_object() else {
        return Ok(());
    };
    let Some(attributes) = attributes.as_object() else {
        return if attributes.is_null() {
            Ok(())
        } else {
            Err(CoreError::Validation(
                "attributes must be a JSON object".to_string(),
            ))
        };
    };

    for (name, value) in attributes {
        let Some(declared) = schema.get(name).and_then(Value::as_str) else {
            continue;
        };
        let ty = AttributeType::parse(declared);
        if !ty.accepts(value) {
            return Err(CoreError::Validation(format!(
                "attribute '{name}' must be of type {declared}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn conforming_attributes_pass() {
        let schema = json!({
            "size": "string",
            "weight_kg": "number",
            "purchased": "date",
            "retired": "boolean",
        });
        let attributes = json!({
            "size": "M",
            "weight_kg": 1.4,
            "purchased": "2024-03-01",
            "retired": false,
            "undeclared": [1, 2, 3],
        });
        assert!(validate_attributes(&schema, &attributes).is_ok());
    }

    #[test]
    fn type_mismatch_fails() {
        let schema = json!({"weight_kg": "number"});
        assert_matches!(
            validate_attributes(&schema, &json!({"weight_kg": "heavy"})),
            Err(CoreError::Validation(msg)) if msg.contains("weight_kg")
        );
    }

    #[test]
    fn malformed_date_fails() {
        let schema = json!({"purchased": "date"});
        assert!(validate_attributes(&schema, &json!({"purchased": "2024-03-01"})).is_ok());
        assert_matches!(
            validate_attributes(&schema, &json!({"purchased": "03/01/2024"})),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn unrecognized_declared_type_accepts_anything() {
        let schema = json!({"shape": "polygon"});
        assert!(validate_attributes(&schema, &json!({"shape": {"sides": 6}})).is_ok());
    }

    #[test]
    fn missing_declared_attribute_is_allowed() {
        let schema = json!({"size": "string"});
        assert!(validate_attributes(&schema, &json!({})).is_ok());
    }

    #[test]
    fn empty_or_absent_schema_accepts_all() {
        assert!(validate_attributes(&Value::Null, &json!({"anything": 1})).is_ok());
        assert!(validate_attributes(&json!({}), &json!({"anything": 1})).is_ok());
    }
}
