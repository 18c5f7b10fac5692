//! API module
//!
//! HTTP endpoints, extractors and middleware.

pub mod companies;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod users;

pub use routes::create_router;

use serde::Serialize;

/// Body for operations that only report success
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
