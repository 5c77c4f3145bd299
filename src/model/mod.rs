//! Typed rows and insert payloads
//!
//! Each entity has a persisted-row type carrying every column and an
//! insert-payload type carrying only the caller-suppliable ones. Payloads
//! decoded with `from_json` have passed the catalog's insert validator.
//! Payloads built directly are unchecked until the store validates them.

mod club;
mod content;
mod message;
mod social;
mod study_group;
mod user;

pub use club::{Club, ClubMembership, InsertClub, InsertClubMembership};
pub use content::{AnonymousVibe, InsertAnonymousVibe, InsertSharedNote, SharedNote};
pub use message::{InsertMessage, Message, MessageTarget};
pub use social::{InsertMatch, InsertProfileLike, Match, ProfileLike};
pub use study_group::{InsertStudyGroup, InsertStudyGroupMember, StudyGroup, StudyGroupMember};
pub use user::{InsertProfile, InsertUser, Profile, User};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::schema::{
    Catalog, InsertValidator, SchemaError, SchemaResult, ValidationDetails, ValidationOptions,
};

/// A persisted row
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// Table the row lives in
    const TABLE: &'static str;

    type Insert: InsertPayload;

    fn id(&self) -> i32;

    /// Strips server-assigned fields.
    fn to_insert(&self) -> Self::Insert;
}

/// Caller-suppliable subset of an entity
pub trait InsertPayload: Serialize + DeserializeOwned + Clone {
    type Row: Entity;

    /// Materializes a row: assigns the id and timestamps, applies column
    /// defaults and initial counter values.
    fn into_row(self, id: i32, now: DateTime<Utc>) -> Self::Row;

    /// Validates and decodes an untrusted payload with default options.
    fn from_json(catalog: &Catalog, payload: &Value) -> SchemaResult<Self> {
        Self::from_json_with(catalog, payload, ValidationOptions::default())
    }

    fn from_json_with(
        catalog: &Catalog,
        payload: &Value,
        options: ValidationOptions,
    ) -> SchemaResult<Self> {
        let table = catalog.table(Self::Row::TABLE)?;
        let accepted = InsertValidator::with_options(table, options).validate(payload)?;
        serde_json::from_value(Value::Object(accepted)).map_err(|e| {
            SchemaError::validation_failed(
                &table.name,
                vec![ValidationDetails::type_mismatch(
                    "$root",
                    table.entity.as_str(),
                    e.to_string(),
                )],
            )
        })
    }
}
