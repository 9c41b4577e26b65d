//! Transaction API endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use entities::{Transaction, TransactionKind};
use finance_store::{FinanceStore, TransactionFilter};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::api::parse_date;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthenticatedUser;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    pub category_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn transaction_not_found() -> ApiError {
    ApiError::NotFound("Transaction not found".to_string())
}

fn parse_kind(value: &str) -> ApiResult<TransactionKind> {
    TransactionKind::parse(value).ok_or_else(|| {
        ApiError::InvalidRequest(
            "Transaction type must be either \"income\" or \"expense\"".to_string(),
        )
    })
}

/// Lists the user's transactions, optionally filtered, newest first.
pub async fn list_transactions<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Query(query): Query<ListTransactionsQuery>,
) -> ApiResult<Json<Value>> {
    let filter = TransactionFilter {
        category_id: query.category_id,
        kind: query.kind.as_deref().map(parse_kind).transpose()?,
        from: query
            .start_date
            .as_deref()
            .map(|s| parse_date(s, "start_date"))
            .transpose()?,
        to: query
            .end_date
            .as_deref()
            .map(|s| parse_date(s, "end_date"))
            .transpose()?,
    };

    let transactions = state.store.list_transactions(current.id, filter).await?;

    Ok(Json(json!({ "transactions": transactions })))
}

/// Gets one transaction by ID.
pub async fn get_transaction<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let transaction = state
        .store
        .get_transaction(id, current.id)
        .await?
        .ok_or_else(transaction_not_found)?;

    Ok(Json(json!({ "transaction": transaction })))
}

/// Creates a new transaction.
pub async fn create_transaction<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let (amount, kind, category_id) = match (request.amount, request.kind, request.category_id) {
        (Some(amount), Some(kind), Some(category_id)) => (amount, kind, category_id),
        _ => {
            return Err(ApiError::InvalidRequest(
                "Missing required fields".to_string(),
            ));
        }
    };
    let kind = parse_kind(&kind)?;

    if amount <= 0.0 {
        return Err(ApiError::InvalidRequest(
            "Amount must be positive".to_string(),
        ));
    }

    // The category must exist and belong to the caller.
    state
        .store
        .get_category(category_id, current.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    let mut transaction = Transaction::new(amount, kind, category_id, current.id);
    if let Some(description) = request.description {
        transaction = transaction.with_description(description);
    }
    if let Some(date) = request.date {
        transaction = transaction.with_date(parse_date(&date, "date")?);
    }

    let transaction = state.store.create_transaction(transaction).await?;

    tracing::info!(
        transaction_id = %transaction.id,
        user_id = %current.id,
        kind = %transaction.kind,
        "Transaction created"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Transaction created successfully",
            "transaction": transaction,
        })),
    ))
}

/// Updates a transaction. Only supplied fields change.
pub async fn update_transaction<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTransactionRequest>,
) -> ApiResult<Json<Value>> {
    let mut transaction = state
        .store
        .get_transaction(id, current.id)
        .await?
        .ok_or_else(transaction_not_found)?;

    if let Some(amount) = request.amount {
        if amount <= 0.0 {
            return Err(ApiError::InvalidRequest(
                "Amount must be positive".to_string(),
            ));
        }
        transaction.amount = amount;
    }
    if let Some(description) = request.description {
        transaction.description = description;
    }
    if let Some(date) = request.date {
        transaction.date = parse_date(&date, "date")?;
    }
    if let Some(kind) = request.kind {
        transaction.kind = parse_kind(&kind)?;
    }
    if let Some(category_id) = request.category_id {
        state
            .store
            .get_category(category_id, current.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;
        transaction.category_id = category_id;
    }

    transaction.updated_at = Utc::now();
    let transaction = state.store.update_transaction(transaction).await?;

    Ok(Json(json!({
        "message": "Transaction updated successfully",
        "transaction": transaction,
    })))
}

/// Deletes a transaction.
pub async fn delete_transaction<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    state
        .store
        .get_transaction(id, current.id)
        .await?
        .ok_or_else(transaction_not_found)?;

    state.store.delete_transaction(id, current.id).await?;

    Ok(Json(json!({ "message": "Transaction deleted successfully" })))
}

/// Returns income/expense totals and a per-category breakdown for the
/// user's transactions, optionally restricted to a date range.
pub async fn get_summary<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<Value>> {
    let filter = TransactionFilter {
        from: query
            .start_date
            .as_deref()
            .map(|s| parse_date(s, "start_date"))
            .transpose()?,
        to: query
            .end_date
            .as_deref()
            .map(|s| parse_date(s, "end_date"))
            .transpose()?,
        ..Default::default()
    };

    let transactions = state.store.list_transactions(current.id, filter).await?;
    let categories = state.store.list_categories(current.id).await?;

    let summary = reports::summarize(&transactions, &categories);

    Ok(Json(json!({ "summary": summary })))
}
