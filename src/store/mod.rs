//! Store Module
//!
//! Generic keyed storage with insertion ordering and per-key TTL expiry.

mod order;
mod timers;
mod ttl_store;


// Re-export public types
pub use order::InsertionOrder;
pub use timers::TimerQueue;
pub use ttl_store::{TtlStore, MAX_TTL};
