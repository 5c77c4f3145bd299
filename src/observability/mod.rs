//! Observability for studymatch
//!
//! Structured JSON logging of typed events. Observability is read-only:
//! nothing here affects validation or storage outcomes.
//!
//! # Usage
//!
//! ```ignore
//! use studymatch::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RowInserted, &[("table", "users"), ("id", "1")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // This just verifies no panic
        log_event(Event::CatalogLoaded);
        log_event_with_fields(Event::RowInserted, &[("table", "users")]);
    }
}
