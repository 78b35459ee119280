//! Background Tasks Module
//!
//! Contains background tasks that run alongside the HTTP server.
//!
//! # Tasks
//! - Entity Expiry: Removes feed entities as their TTL runs out

mod expiry;

pub use expiry::spawn_expiry_task;
