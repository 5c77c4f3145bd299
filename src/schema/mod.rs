//! Schema and insert-validation subsystem
//!
//! Declares every table of the data model and derives insert validators
//! from the declarations.
//!
//! # Rules
//!
//! - Server-assigned fields (ids, timestamps, counters, derived flags) are
//!   never accepted from insert payloads
//! - Validation is pure: no I/O, no logging, no mutation
//! - Every offending field is reported
//! - Foreign keys only point at previously registered tables

mod catalog;
mod ddl;
mod errors;
pub mod relations;
pub mod tables;
mod types;
mod validator;

pub use catalog::Catalog;
pub use ddl::{catalog_ddl, create_table_sql};
pub use errors::{Reason, SchemaError, SchemaErrorCode, SchemaResult, Severity, ValidationDetails};
pub use relations::{Relation, RelationKind};
pub use types::{ColumnDef, ColumnDefault, ColumnType, ExclusiveGroup, ForeignKey, TableDef};
pub use validator::{
    InsertValidator, ServerFieldPolicy, TargetPolicy, UnknownFieldPolicy, ValidationOptions,
};
