//! API endpoints.

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod reports;
pub mod transactions;
pub mod users;

use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use chrono::NaiveDate;
use finance_store::FinanceStore;
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth_middleware;
use crate::state::SharedState;

/// Creates the API router with all endpoints.
pub fn create_router<S: FinanceStore + 'static>(state: SharedState<S>) -> Router {
    let protected = Router::new()
        // Profile endpoints
        .route("/api/users/me", get(users::get_me).put(users::update_me))
        .route("/api/users/me/change-password", post(users::change_password))
        // Category endpoints
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Transaction endpoints
        .route(
            "/api/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route("/api/transactions/summary", get(transactions::get_summary))
        .route(
            "/api/transactions/:id",
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        // Budget endpoints
        .route(
            "/api/budgets",
            get(budgets::list_budgets).post(budgets::create_budget),
        )
        .route("/api/budgets/alerts", get(budgets::get_alerts))
        .route(
            "/api/budgets/:id",
            get(budgets::get_budget)
                .put(budgets::update_budget)
                .delete(budgets::delete_budget),
        )
        // Report endpoints
        .route("/api/reports/spending", get(reports::get_spending))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<S>,
        ));

    Router::new()
        .merge(protected)
        // Auth endpoints (public)
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        // Health check
        .route("/api/health", get(health_check))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

/// Parses a `YYYY-MM-DD` query/body value, naming the field in the error.
pub(crate) fn parse_date(value: &str, field: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::InvalidRequest(format!("Invalid {field} format. Use YYYY-MM-DD"))
    })
}
