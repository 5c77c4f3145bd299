//! Insert-payload validation
//!
//! Validation semantics:
//! - Payload must be a JSON object
//! - Required columns (NOT NULL, no default) are present and non-null
//! - Nullable columns accept an explicit `null`
//! - Types match exactly, no coercion
//! - Varchar values respect their length limit
//! - Server-assigned keys are rejected or stripped, never passed through
//! - Undeclared keys are rejected or stripped
//!
//! Every offending field is reported, in column declaration order followed
//! by undeclared keys in payload order. Validation does not mutate its input.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{ColumnDef, ColumnType, TableDef};

/// Treatment of server-assigned keys found in a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerFieldPolicy {
    #[default]
    Reject,
    Strip,
}

/// Treatment of keys the table does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    #[default]
    Reject,
    Strip,
}

/// Treatment of exactly-one-of groups such as a message's target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPolicy {
    /// Group members are independent nullable columns
    #[default]
    Lenient,
    /// Exactly one member of each group must be non-null
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationOptions {
    pub server_fields: ServerFieldPolicy,
    pub unknown_fields: UnknownFieldPolicy,
    pub targets: TargetPolicy,
}

/// Validates untrusted insert payloads against one table.
pub struct InsertValidator<'a> {
    table: &'a TableDef,
    options: ValidationOptions,
}

impl<'a> InsertValidator<'a> {
    /// Creates a validator with the default (strictest structural) options.
    pub fn new(table: &'a TableDef) -> Self {
        Self::with_options(table, ValidationOptions::default())
    }

    pub fn with_options(table: &'a TableDef, options: ValidationOptions) -> Self {
        Self { table, options }
    }

    pub fn table(&self) -> &TableDef {
        self.table
    }

    /// Validates a payload and returns the accepted subset.
    ///
    /// The returned map contains only insertable keys; server-assigned and
    /// undeclared keys are never part of it.
    ///
    /// # Errors
    ///
    /// Returns `STUDYMATCH_VALIDATION_FAILED` with one `ValidationDetails`
    /// per offending field.
    pub fn validate(&self, payload: &Value) -> SchemaResult<Map<String, Value>> {
        let obj = payload.as_object().ok_or_else(|| {
            SchemaError::validation_failed(
                &self.table.name,
                vec![ValidationDetails::not_an_object(json_type_name(payload))],
            )
        })?;

        let mut details = Vec::new();
        let mut accepted = Map::new();

        for col in &self.table.columns {
            let value = obj.get(&col.key);

            if col.server_assigned {
                if value.is_some() && self.options.server_fields == ServerFieldPolicy::Reject {
                    details.push(ValidationDetails::server_assigned(&col.key));
                }
                continue;
            }

            match value {
                Some(Value::Null) => {
                    if col.accepts_null() {
                        accepted.insert(col.key.clone(), Value::Null);
                    } else {
                        details.push(ValidationDetails::null_value(&col.key));
                    }
                }
                Some(value) => {
                    let before = details.len();
                    check_value(col, value, &mut details);
                    if details.len() == before {
                        accepted.insert(col.key.clone(), value.clone());
                    }
                }
                None => {
                    if col.required_on_insert() {
                        details.push(ValidationDetails::missing_field(&col.key));
                    }
                }
            }
        }

        for key in obj.keys() {
            if self.table.column(key).is_none()
                && self.options.unknown_fields == UnknownFieldPolicy::Reject
            {
                details.push(ValidationDetails::unknown_field(key));
            }
        }

        if self.options.targets == TargetPolicy::Exclusive {
            for group in &self.table.exclusive {
                let present = group
                    .keys
                    .iter()
                    .filter(|k| obj.get(k.as_str()).map_or(false, |v| !v.is_null()))
                    .count();
                if present != 1 {
                    details.push(ValidationDetails::ambiguous_target(&group.name, present));
                }
            }
        }

        if details.is_empty() {
            Ok(accepted)
        } else {
            Err(SchemaError::validation_failed(&self.table.name, details))
        }
    }
}

/// Checks a non-null value against its column type.
fn check_value(col: &ColumnDef, value: &Value, details: &mut Vec<ValidationDetails>) {
    let field = col.key.as_str();
    match col.column_type {
        ColumnType::Serial | ColumnType::Integer => match value.as_i64() {
            Some(n) if i32::try_from(n).is_ok() => {}
            Some(_) => details.push(ValidationDetails::type_mismatch(
                field,
                "32-bit integer",
                "integer out of range",
            )),
            None => details.push(type_error(field, "integer", value)),
        },
        ColumnType::Boolean => {
            if !value.is_boolean() {
                details.push(type_error(field, "boolean", value));
            }
        }
        ColumnType::Text => {
            if !value.is_string() {
                details.push(type_error(field, "string", value));
            }
        }
        ColumnType::Varchar { length } => match value.as_str() {
            Some(s) => {
                let chars = s.chars().count();
                if chars > length {
                    details.push(ValidationDetails::too_long(field, length, chars));
                }
            }
            None => details.push(type_error(field, "string", value)),
        },
        ColumnType::Timestamp => {
            let parsed = value
                .as_str()
                .map_or(false, |s| DateTime::parse_from_rfc3339(s).is_ok());
            if !parsed {
                details.push(type_error(field, "RFC 3339 timestamp", value));
            }
        }
        ColumnType::StringList => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        details.push(type_error(&format!("{}[{}]", field, i), "string", item));
                    }
                }
            }
            None => details.push(type_error(field, "array of strings", value)),
        },
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(field: &str, expected: &str, actual: &Value) -> ValidationDetails {
    ValidationDetails::type_mismatch(field, expected, json_type_name(actual))
}
