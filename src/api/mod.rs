//! API Module
//!
//! HTTP handlers and routing for the feed server.
//!
//! # Endpoints
//! - `GET /`, `GET /feed.pb` - The assembled GTFS Realtime feed
//! - `PUT /trips` - Store a trip record as a trip update
//! - `PUT /movements` - Store a movement record as a vehicle position
//! - `DELETE /entities/*key` - Delete one entity
//! - `DELETE /entities` - Delete every entity
//! - `GET /stats` - Get feed statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
