//! HTTP transport for the hub
//!
//! Decodes device readings, evaluates them against the humidity policy and
//! hands the resulting status to the hub. Subscribers receive updates as
//! server-sent events.

pub mod http;
pub mod rest;
pub mod sse;
pub mod state;

pub use http::{create_router, serve, ServerError};
pub use state::AppState;
