//! Error types for the feed service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::record::RecordKind;

// == Feed Error Enum ==
/// Unified error type for the feed service.
///
/// None of these are fatal: a failed write leaves previously accepted
/// entities untouched and the feed keeps serving them.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Neither a trip id nor a (route id, vehicle id) pair could be derived
    #[error("Unidentifiable {0} record: no trip id and no route/vehicle pair")]
    UnidentifiableEntity(RecordKind),

    /// The record violates an assumption of the wire schema
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Payload length does not fit a four byte varint prefix
    #[error("Payload of {length} bytes exceeds frame capacity")]
    Capacity { length: usize },

    /// No entity stored under the key
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let status = match &self {
            FeedError::UnidentifiableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FeedError::Encoding(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FeedError::Capacity { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            FeedError::NotFound(_) => StatusCode::NOT_FOUND,
            FeedError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the feed service.
pub type Result<T> = std::result::Result<T, FeedError>;
