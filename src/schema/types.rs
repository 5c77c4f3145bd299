//! Column and table definitions
//!
//! Supported column types:
//! - serial: auto-incrementing 32-bit primary key
//! - integer: 32-bit signed integer
//! - boolean
//! - text: unbounded UTF-8 string
//! - varchar: UTF-8 string with a maximum character length
//! - timestamp: RFC 3339 instant
//! - string_list: JSONB array of strings

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Column types used by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnType {
    /// Auto-incrementing integer, only valid as a primary key
    Serial,
    /// 32-bit signed integer
    Integer,
    /// Boolean
    Boolean,
    /// Unbounded text
    Text,
    /// Bounded text
    Varchar {
        /// Maximum length in characters
        length: usize,
    },
    /// Timestamp without time zone
    Timestamp,
    /// JSONB array of strings
    StringList,
}

impl ColumnType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Serial => "serial",
            ColumnType::Integer => "integer",
            ColumnType::Boolean => "boolean",
            ColumnType::Text => "string",
            ColumnType::Varchar { .. } => "string",
            ColumnType::Timestamp => "timestamp",
            ColumnType::StringList => "string[]",
        }
    }

    /// Returns the PostgreSQL type used in DDL
    pub fn sql_type(&self) -> String {
        match self {
            ColumnType::Serial => "SERIAL".into(),
            ColumnType::Integer => "INTEGER".into(),
            ColumnType::Boolean => "BOOLEAN".into(),
            ColumnType::Text => "TEXT".into(),
            ColumnType::Varchar { length } => format!("VARCHAR({})", length),
            ColumnType::Timestamp => "TIMESTAMP".into(),
            ColumnType::StringList => "JSONB".into(),
        }
    }
}

/// Database-side default for a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ColumnDefault {
    Bool(bool),
    Int(i32),
    Text(String),
    /// `now()` at insert time
    Now,
    /// `'[]'::jsonb`
    EmptyList,
}

/// Foreign-key target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Referenced table name
    pub table: String,
    /// Referenced column name
    pub column: String,
}

/// Column definition
///
/// `key` is the camelCase name used in JSON payloads, `column` the
/// snake_case name used in SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub key: String,
    pub column: String,
    #[serde(flatten)]
    pub column_type: ColumnType,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ColumnDefault>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ForeignKey>,
    /// Set by the system, never accepted from insert payloads
    #[serde(default)]
    pub server_assigned: bool,
}

impl ColumnDef {
    /// Create a nullable column with no default
    pub fn new(key: impl Into<String>, column: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            key: key.into(),
            column: column.into(),
            column_type,
            not_null: false,
            primary_key: false,
            unique: false,
            default: None,
            references: None,
            server_assigned: false,
        }
    }

    /// The `id SERIAL PRIMARY KEY` column every table carries
    pub fn serial_id() -> Self {
        let mut col = Self::new("id", "id", ColumnType::Serial);
        col.primary_key = true;
        col.not_null = true;
        col.server_assigned = true;
        col
    }

    /// A `NOT NULL DEFAULT now()` timestamp filled in by the server
    pub fn stamped(key: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(key, column, ColumnType::Timestamp)
            .not_null()
            .default_value(ColumnDefault::Now)
            .server_assigned()
    }

    /// A required varchar column
    pub fn required_varchar(key: impl Into<String>, column: impl Into<String>, length: usize) -> Self {
        Self::new(key, column, ColumnType::Varchar { length }).not_null()
    }

    /// A required text column
    pub fn required_text(key: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(key, column, ColumnType::Text).not_null()
    }

    /// A nullable text column
    pub fn optional_text(key: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(key, column, ColumnType::Text)
    }

    /// A required integer foreign key to `table.id`
    pub fn required_ref(key: impl Into<String>, column: impl Into<String>, table: &str) -> Self {
        Self::new(key, column, ColumnType::Integer).not_null().references(table, "id")
    }

    /// A nullable integer foreign key to `table.id`
    pub fn optional_ref(key: impl Into<String>, column: impl Into<String>, table: &str) -> Self {
        Self::new(key, column, ColumnType::Integer).references(table, "id")
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, default: ColumnDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub fn references(mut self, table: &str, column: &str) -> Self {
        self.references = Some(ForeignKey {
            table: table.to_string(),
            column: column.to_string(),
        });
        self
    }

    pub fn server_assigned(mut self) -> Self {
        self.server_assigned = true;
        self
    }

    /// Whether an insert payload must supply this column
    pub fn required_on_insert(&self) -> bool {
        !self.server_assigned && self.not_null && self.default.is_none()
    }

    /// Whether an explicit `null` is acceptable
    pub fn accepts_null(&self) -> bool {
        !self.not_null
    }
}

/// Exactly-one-of constraint over nullable columns, enforced only under
/// [`crate::schema::TargetPolicy::Exclusive`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusiveGroup {
    pub name: String,
    pub keys: Vec<String>,
}

/// Complete table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    /// SQL table name
    pub name: String,
    /// Entity name used in messages
    pub entity: String,
    /// Columns in declaration order
    pub columns: Vec<ColumnDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusive: Vec<ExclusiveGroup>,
}

impl TableDef {
    /// Create a new table definition
    pub fn new(name: impl Into<String>, entity: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            entity: entity.into(),
            columns,
            exclusive: Vec::new(),
        }
    }

    /// Attach an exactly-one-of group
    pub fn with_exclusive(mut self, name: &str, keys: &[&str]) -> Self {
        self.exclusive.push(ExclusiveGroup {
            name: name.to_string(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        });
        self
    }

    /// Looks up a column by payload key
    pub fn column(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Looks up a column by SQL name
    pub fn column_by_name(&self, column: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Columns a caller may supply on insert
    pub fn insert_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| !c.server_assigned)
    }

    /// Payload keys the server assigns
    pub fn server_assigned_keys(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.server_assigned)
            .map(|c| c.key.as_str())
            .collect()
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = (&ColumnDef, &ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|c| c.references.as_ref().map(|fk| (c, fk)))
    }

    /// Validates the definition itself (not a payload)
    pub fn validate_structure(&self) -> Result<(), String> {
        let pk_count = self.columns.iter().filter(|c| c.primary_key).count();
        if pk_count != 1 {
            return Err(format!(
                "table '{}' must declare exactly one primary key, found {}",
                self.name, pk_count
            ));
        }
        if self.primary_key().map(|pk| &pk.column_type) != Some(&ColumnType::Serial) {
            return Err(format!("primary key of '{}' must be serial", self.name));
        }

        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        for col in &self.columns {
            if !keys.insert(col.key.as_str()) {
                return Err(format!("duplicate key '{}' in '{}'", col.key, self.name));
            }
            if !names.insert(col.column.as_str()) {
                return Err(format!("duplicate column '{}' in '{}'", col.column, self.name));
            }
            if col.column_type == ColumnType::Serial && !col.primary_key {
                return Err(format!("serial column '{}' must be the primary key", col.column));
            }
            // A server-assigned NOT NULL column needs something to fill it
            if col.server_assigned && col.not_null && col.default.is_none() && !col.primary_key {
                return Err(format!(
                    "server-assigned column '{}' has no default",
                    col.column
                ));
            }
        }

        for group in &self.exclusive {
            for key in &group.keys {
                match self.column(key) {
                    Some(col) if col.accepts_null() => {}
                    Some(_) => {
                        return Err(format!(
                            "exclusive group '{}' member '{}' must be nullable",
                            group.name, key
                        ))
                    }
                    None => {
                        return Err(format!(
                            "exclusive group '{}' names unknown key '{}'",
                            group.name, key
                        ))
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> TableDef {
        TableDef::new(
            "posts",
            "Post",
            vec![
                ColumnDef::serial_id(),
                ColumnDef::required_varchar("title", "title", 80),
                ColumnDef::optional_text("body", "body"),
                ColumnDef::stamped("createdAt", "created_at"),
            ],
        )
    }

    #[test]
    fn test_table_structure_valid() {
        assert!(sample_table().validate_structure().is_ok());
    }

    #[test]
    fn test_missing_primary_key() {
        let table = TableDef::new("t", "T", vec![ColumnDef::required_text("a", "a")]);
        let err = table.validate_structure().unwrap_err();
        assert!(err.contains("primary key"));
    }

    #[test]
    fn test_primary_key_must_be_serial() {
        let mut code = ColumnDef::required_text("code", "code");
        code.primary_key = true;
        let table = TableDef::new("t", "T", vec![code]);
        assert!(table.validate_structure().unwrap_err().contains("must be serial"));
        assert_eq!(sample_table().primary_key().map(|c| c.key.as_str()), Some("id"));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut table = sample_table();
        table.columns.push(ColumnDef::optional_text("title", "title_two"));
        assert!(table.validate_structure().unwrap_err().contains("duplicate key"));
    }

    #[test]
    fn test_server_assigned_not_null_needs_default() {
        let mut table = sample_table();
        table.columns.push(
            ColumnDef::new("score", "score", ColumnType::Integer)
                .not_null()
                .server_assigned(),
        );
        assert!(table.validate_structure().unwrap_err().contains("no default"));
    }

    #[test]
    fn test_exclusive_group_requires_nullable_members() {
        let table = sample_table().with_exclusive("content", &["title", "body"]);
        assert!(table.validate_structure().unwrap_err().contains("nullable"));
    }

    #[test]
    fn test_insert_requirements() {
        let table = sample_table();
        assert!(table.column("title").unwrap().required_on_insert());
        assert!(!table.column("body").unwrap().required_on_insert());
        assert!(!table.column("createdAt").unwrap().required_on_insert());
        assert_eq!(table.server_assigned_keys(), vec!["id", "createdAt"]);
        assert_eq!(table.insert_columns().count(), 2);
    }

    #[test]
    fn test_column_type_names() {
        assert_eq!(ColumnType::Integer.type_name(), "integer");
        assert_eq!(ColumnType::Varchar { length: 10 }.type_name(), "string");
        assert_eq!(ColumnType::StringList.type_name(), "string[]");
        assert_eq!(ColumnType::Varchar { length: 10 }.sql_type(), "VARCHAR(10)");
        assert_eq!(ColumnType::StringList.sql_type(), "JSONB");
    }

    #[test]
    fn test_definition_serializes_flat() {
        let col = ColumnDef::required_varchar("email", "email", 255).unique();
        let value = serde_json::to_value(&col).unwrap();
        assert_eq!(value["type"], "varchar");
        assert_eq!(value["length"], 255);
        assert_eq!(value["unique"], true);
    }
}
