//! Row storage behind the insert schemas
//!
//! The store accepts only validated insert payloads and assigns every
//! server-owned value itself: ids, timestamps, defaults and counters.

mod clock;
mod errors;
mod memory;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
