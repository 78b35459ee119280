//! Response models for the feed server API
//!
//! Request bodies are the canonical records from [`crate::record`]; this
//! module defines the JSON bodies sent back.

pub mod responses;

// Re-export commonly used types
pub use responses::{
    DeleteResponse, FlushResponse, HealthResponse, StatsResponse, WriteResponse,
};
