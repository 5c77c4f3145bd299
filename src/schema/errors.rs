//! Schema error types
//!
//! Error codes:
//! - STUDYMATCH_VALIDATION_FAILED (REJECT)
//! - STUDYMATCH_UNKNOWN_TABLE (REJECT)
//! - STUDYMATCH_DUPLICATE_TABLE (FATAL)
//! - STUDYMATCH_INVALID_DEFINITION (FATAL)

use std::fmt;

use serde::Serialize;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller input rejected
    Reject,
    /// The catalog itself is broken; nothing can be validated
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Payload violates the insert schema
    ValidationFailed,
    /// Table name not in the catalog
    UnknownTable,
    /// Table registered twice
    DuplicateTable,
    /// Table or relation definition is inconsistent
    InvalidDefinition,
}

impl SchemaErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::ValidationFailed => "STUDYMATCH_VALIDATION_FAILED",
            SchemaErrorCode::UnknownTable => "STUDYMATCH_UNKNOWN_TABLE",
            SchemaErrorCode::DuplicateTable => "STUDYMATCH_DUPLICATE_TABLE",
            SchemaErrorCode::InvalidDefinition => "STUDYMATCH_INVALID_DEFINITION",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::ValidationFailed | SchemaErrorCode::UnknownTable => Severity::Reject,
            SchemaErrorCode::DuplicateTable | SchemaErrorCode::InvalidDefinition => Severity::Fatal,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Why a single field failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    Missing,
    NullNotAllowed,
    TypeMismatch,
    TooLong,
    ServerAssigned,
    UnknownField,
    NotAnObject,
    AmbiguousTarget,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Missing => "missing",
            Reason::NullNotAllowed => "null_not_allowed",
            Reason::TypeMismatch => "type_mismatch",
            Reason::TooLong => "too_long",
            Reason::ServerAssigned => "server_assigned",
            Reason::UnknownField => "unknown_field",
            Reason::NotAnObject => "not_an_object",
            Reason::AmbiguousTarget => "ambiguous_target",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validation failure details for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetails {
    /// Field path (e.g., "photos[2]")
    pub field: String,
    pub reason: Reason,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        reason: Reason,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            reason,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, Reason::Missing, "field to be present", "missing")
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, Reason::NullNotAllowed, "non-null value", "null")
    }

    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(field, Reason::TypeMismatch, expected, actual)
    }

    pub fn too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        Self::new(
            field,
            Reason::TooLong,
            format!("at most {} characters", max),
            format!("{} characters", actual),
        )
    }

    pub fn server_assigned(field: impl Into<String>) -> Self {
        Self::new(field, Reason::ServerAssigned, "field to be absent", "caller-supplied value")
    }

    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::new(field, Reason::UnknownField, "no undeclared fields", "extra field present")
    }

    pub fn not_an_object(actual: impl Into<String>) -> Self {
        Self::new("$root", Reason::NotAnObject, "object", actual)
    }

    pub fn ambiguous_target(group: impl Into<String>, present: usize) -> Self {
        Self::new(
            group,
            Reason::AmbiguousTarget,
            "exactly one target",
            format!("{} targets", present),
        )
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}' ({}): expected {}, got {}",
            self.field, self.reason, self.expected, self.actual
        )
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    table: Option<String>,
    details: Vec<ValidationDetails>,
}

impl SchemaError {
    /// Create a validation failed error listing every offending field
    pub fn validation_failed(table: impl Into<String>, details: Vec<ValidationDetails>) -> Self {
        let table = table.into();
        let summary = details
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            code: SchemaErrorCode::ValidationFailed,
            message: format!("Insert into '{}' rejected: {}", table, summary),
            table: Some(table),
            details,
        }
    }

    pub fn unknown_table(table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            code: SchemaErrorCode::UnknownTable,
            message: format!("Table '{}' not found", table),
            table: Some(table),
            details: Vec::new(),
        }
    }

    pub fn duplicate_table(table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            code: SchemaErrorCode::DuplicateTable,
            message: format!("Table '{}' is already registered", table),
            table: Some(table),
            details: Vec::new(),
        }
    }

    pub fn invalid_definition(table: impl Into<String>, reason: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            code: SchemaErrorCode::InvalidDefinition,
            message: format!("Invalid definition for '{}': {}", table, reason.into()),
            table: Some(table),
            details: Vec::new(),
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn details(&self) -> &[ValidationDetails] {
        &self.details
    }

    /// Returns the details for a given field path, if any
    pub fn detail_for(&self, field: &str) -> Option<&ValidationDetails> {
        self.details.iter().find(|d| d.field == field)
    }

    /// Field paths that failed, in report order
    pub fn fields(&self) -> Vec<&str> {
        self.details.iter().map(|d| d.field.as_str()).collect()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
