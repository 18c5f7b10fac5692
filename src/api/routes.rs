//! API Routes
//!
//! Endpoint table and the health check.

use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use super::{companies, users};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Create the API router
pub fn create_router() -> Router<PgPool> {
    Router::new()
        .route("/health", get(health_check))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Companies
        .route(
            "/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route("/companies/select", get(companies::select_companies))
        .route(
            "/companies/:id",
            get(companies::get_company).delete(companies::delete_company),
        )
        // Receivables
        .route("/companies/:id/receivables", post(companies::add_receivable))
        .route(
            "/companies/:id/receivables/:account_id",
            patch(companies::update_receivable).delete(companies::delete_receivable),
        )
        // Payables
        .route("/companies/:id/payables", post(companies::add_payable))
        .route(
            "/companies/:id/payables/:account_id",
            patch(companies::update_payable).delete(companies::delete_payable),
        )
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
    })
}
