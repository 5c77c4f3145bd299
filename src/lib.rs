//! studymatch - data model and insert contracts for a campus study-matching
//! and social app
//!
//! - `schema`: table catalog, relations, insert validation, DDL
//! - `model`: typed rows and insert payloads
//! - `store`: in-memory reference store
//! - `observability`: structured JSON logging

pub mod cli;
pub mod model;
pub mod observability;
pub mod schema;
pub mod store;
