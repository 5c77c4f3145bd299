//! Catalog of table definitions and relations
//!
//! - Tables are registered once; re-registering a name is FATAL
//! - A foreign key may only point at a table registered before it, so
//!   registration order is a valid DDL order
//! - Relations must name registered tables and declared columns

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::relations::{self, Relation};
use super::tables;
use super::types::TableDef;
use super::validator::{InsertValidator, ValidationOptions};

/// Registry of table definitions in dependency order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: Vec<TableDef>,
    index: HashMap<String, usize>,
    relations: Vec<Relation>,
}

/// Serialized form of a catalog
#[derive(Debug, Serialize, Deserialize)]
struct CatalogDocument {
    tables: Vec<TableDef>,
    #[serde(default)]
    relations: Vec<Relation>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the catalog of the campus data model.
    pub fn standard() -> SchemaResult<Self> {
        let mut catalog = Self::new();
        for table in tables::all() {
            catalog.register(table)?;
        }
        for relation in relations::all() {
            catalog.add_relation(relation)?;
        }
        Ok(catalog)
    }

    /// Registers a table definition.
    pub fn register(&mut self, table: TableDef) -> SchemaResult<()> {
        table
            .validate_structure()
            .map_err(|e| SchemaError::invalid_definition(&table.name, e))?;

        if self.index.contains_key(&table.name) {
            return Err(SchemaError::duplicate_table(&table.name));
        }

        for (col, fk) in table.foreign_keys() {
            let target = self.get(&fk.table).ok_or_else(|| {
                SchemaError::invalid_definition(
                    &table.name,
                    format!(
                        "column '{}' references unregistered table '{}'",
                        col.column, fk.table
                    ),
                )
            })?;
            if target.column_by_name(&fk.column).is_none() {
                return Err(SchemaError::invalid_definition(
                    &table.name,
                    format!(
                        "column '{}' references missing column '{}.{}'",
                        col.column, fk.table, fk.column
                    ),
                ));
            }
        }

        self.index.insert(table.name.clone(), self.tables.len());
        self.tables.push(table);
        Ok(())
    }

    /// Adds relation metadata after checking it against registered tables.
    pub fn add_relation(&mut self, relation: Relation) -> SchemaResult<()> {
        let source = self
            .get(&relation.source)
            .ok_or_else(|| SchemaError::unknown_table(&relation.source))?;
        let target = self
            .get(&relation.target)
            .ok_or_else(|| SchemaError::unknown_table(&relation.target))?;

        if relation.fields.len() != relation.references.len() {
            return Err(SchemaError::invalid_definition(
                &relation.source,
                format!("relation '{}' has mismatched field lists", relation.name),
            ));
        }

        for (field, reference) in relation.fields.iter().zip(&relation.references) {
            let col = source.column_by_name(field).ok_or_else(|| {
                SchemaError::invalid_definition(
                    &relation.source,
                    format!("relation '{}' uses unknown column '{}'", relation.name, field),
                )
            })?;
            let points_at_target = col
                .references
                .as_ref()
                .map_or(false, |fk| fk.table == target.name && fk.column == *reference);
            if !points_at_target {
                return Err(SchemaError::invalid_definition(
                    &relation.source,
                    format!(
                        "relation '{}' column '{}' is not a foreign key to '{}.{}'",
                        relation.name, field, target.name, reference
                    ),
                ));
            }
        }

        if self
            .relations
            .iter()
            .any(|r| r.source == relation.source && r.name == relation.name)
        {
            return Err(SchemaError::invalid_definition(
                &relation.source,
                format!("relation '{}' declared twice", relation.name),
            ));
        }

        self.relations.push(relation);
        Ok(())
    }

    /// Gets a table by name.
    pub fn get(&self, name: &str) -> Option<&TableDef> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    /// Gets a table by name, failing with `STUDYMATCH_UNKNOWN_TABLE`.
    pub fn table(&self, name: &str) -> SchemaResult<&TableDef> {
        self.get(name).ok_or_else(|| SchemaError::unknown_table(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tables in registration (dependency) order.
    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.iter()
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Relations declared on the given table.
    pub fn relations_of<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a Relation> + 'a {
        self.relations.iter().filter(move |r| r.source == table)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Validates an insert payload for `table` with default options.
    pub fn validate_insert(&self, table: &str, payload: &Value) -> SchemaResult<Map<String, Value>> {
        self.validate_insert_with(table, payload, ValidationOptions::default())
    }

    pub fn validate_insert_with(
        &self,
        table: &str,
        payload: &Value,
        options: ValidationOptions,
    ) -> SchemaResult<Map<String, Value>> {
        InsertValidator::with_options(self.table(table)?, options).validate(payload)
    }

    /// Serializes tables and relations as pretty JSON.
    pub fn to_json_pretty(&self) -> SchemaResult<String> {
        let doc = CatalogDocument {
            tables: self.tables.clone(),
            relations: self.relations.clone(),
        };
        serde_json::to_string_pretty(&doc)
            .map_err(|e| SchemaError::invalid_definition("<catalog>", e.to_string()))
    }

    /// Rebuilds a catalog from its JSON form, re-running every check.
    pub fn from_json_str(content: &str) -> SchemaResult<Self> {
        let doc: CatalogDocument = serde_json::from_str(content)
            .map_err(|e| SchemaError::invalid_definition("<catalog>", format!("Invalid JSON: {}", e)))?;

        let mut catalog = Self::new();
        for table in doc.tables {
            catalog.register(table)?;
        }
        for relation in doc.relations {
            catalog.add_relation(relation)?;
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::SchemaErrorCode;
    use crate::schema::types::ColumnDef;
    use serde_json::json;

    #[test]
    fn test_standard_catalog_loads() {
        let catalog = Catalog::standard().unwrap();
        assert_eq!(catalog.table_count(), 11);
        assert!(catalog.exists(tables::USERS));
        assert_eq!(catalog.relations_of(tables::USERS).count(), 10);
    }

    #[test]
    fn test_duplicate_table_is_fatal() {
        let mut catalog = Catalog::new();
        catalog.register(tables::users()).unwrap();

        let err = catalog.register(tables::users()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::DuplicateTable);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_foreign_key_needs_registered_target() {
        let mut catalog = Catalog::new();
        let err = catalog.register(tables::profiles()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidDefinition);
        assert!(err.message().contains("users"));
    }

    #[test]
    fn test_foreign_key_to_missing_column() {
        let mut catalog = Catalog::new();
        catalog.register(tables::users()).unwrap();

        let table = TableDef::new(
            "badges",
            "Badge",
            vec![
                ColumnDef::serial_id(),
                ColumnDef::new("ownerId", "owner_id", crate::schema::ColumnType::Integer)
                    .references(tables::USERS, "uuid"),
            ],
        );
        let err = catalog.register(table).unwrap_err();
        assert!(err.message().contains("users.uuid"));
    }

    #[test]
    fn test_relation_must_match_foreign_key() {
        let mut catalog = Catalog::new();
        catalog.register(tables::users()).unwrap();
        catalog.register(tables::clubs()).unwrap();
        catalog.register(tables::club_memberships()).unwrap();

        let wrong = Relation::one(tables::CLUB_MEMBERSHIPS, "club", tables::USERS).via("club_id");
        assert!(catalog.add_relation(wrong).is_err());

        let right = Relation::one(tables::CLUB_MEMBERSHIPS, "club", tables::CLUBS).via("club_id");
        assert!(catalog.add_relation(right).is_ok());
    }

    #[test]
    fn test_relation_to_unknown_table() {
        let mut catalog = Catalog::new();
        catalog.register(tables::users()).unwrap();
        let err = catalog
            .add_relation(Relation::one(tables::USERS, "profile", tables::PROFILES))
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnknownTable);
    }

    #[test]
    fn test_unknown_table_lookup() {
        let catalog = Catalog::standard().unwrap();
        assert!(catalog.get("friends").is_none());
        assert_eq!(
            catalog.table("friends").unwrap_err().code(),
            SchemaErrorCode::UnknownTable
        );
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let catalog = Catalog::standard().unwrap();
        let json = catalog.to_json_pretty().unwrap();
        let reloaded = Catalog::from_json_str(&json).unwrap();

        let names: Vec<_> = reloaded.tables().map(|t| t.name.as_str()).collect();
        let expected: Vec<_> = catalog.tables().map(|t| t.name.as_str()).collect();
        assert_eq!(names, expected);
        assert_eq!(reloaded.relations(), catalog.relations());
        assert_eq!(reloaded.get(tables::MESSAGES), catalog.get(tables::MESSAGES));
    }

    #[test]
    fn test_validate_insert_by_table_name() {
        let catalog = Catalog::standard().unwrap();
        let accepted = catalog
            .validate_insert("club_memberships", &json!({ "userId": 1, "clubId": 2 }))
            .unwrap();
        assert_eq!(accepted.len(), 2);

        let err = catalog.validate_insert("friends", &json!({})).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnknownTable);
    }
}
