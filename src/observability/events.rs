//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file read (or defaults applied)
    ConfigLoaded,
    /// Catalog built and checked
    CatalogLoaded,
    /// Catalog failed its integrity checks (FATAL)
    CatalogInvalid,
    /// Payload accepted by an insert validator
    InsertValidated,
    /// Payload rejected by an insert validator
    InsertRejected,
    /// Row materialized and stored
    RowInserted,
    /// Insert refused by a row-level constraint (foreign key, unique)
    InsertConflict,
    /// DDL emitted
    DdlRendered,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogLoaded => "CATALOG_LOADED",
            Event::CatalogInvalid => "CATALOG_INVALID",
            Event::InsertValidated => "INSERT_VALIDATED",
            Event::InsertRejected => "INSERT_REJECTED",
            Event::RowInserted => "ROW_INSERTED",
            Event::InsertConflict => "INSERT_CONFLICT",
            Event::DdlRendered => "DDL_RENDERED",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::CatalogInvalid)
    }

    /// Severity the event is logged at by default
    pub fn severity(&self) -> super::Severity {
        use super::Severity;
        match self {
            Event::CatalogInvalid => Severity::Fatal,
            Event::InsertRejected | Event::InsertConflict => Severity::Warn,
            Event::InsertValidated => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
