//! Budget API endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use entities::{Budget, Category, Transaction, TransactionKind};
use finance_store::{BudgetFilter, FinanceStore, TransactionFilter};
use reports::{budget_snapshot, evaluate_budgets};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::api::parse_date;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthenticatedUser;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ListBudgetsQuery {
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    pub category_id: Option<Uuid>,
    pub amount: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    pub amount: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category_id: Option<Uuid>,
}

fn budget_not_found() -> ApiError {
    ApiError::NotFound("Budget not found".to_string())
}

/// A budget serialized together with its current spending figures.
fn decorate_budget(
    budget: &Budget,
    transactions: &[Transaction],
    categories: &[Category],
) -> ApiResult<Value> {
    let snapshot = budget_snapshot(budget, transactions);
    let category_name = categories
        .iter()
        .find(|c| c.id == budget.category_id)
        .map(|c| c.name.clone());

    let mut value = serde_json::to_value(budget)
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    value["category_name"] = json!(category_name);
    value["spent"] = json!(snapshot.spent);
    value["remaining"] = json!(snapshot.remaining);
    value["percentage_used"] = json!(snapshot.percentage_used);

    Ok(value)
}

/// Lists the user's budgets with spending figures attached.
pub async fn list_budgets<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Query(query): Query<ListBudgetsQuery>,
) -> ApiResult<Json<Value>> {
    let filter = BudgetFilter {
        category_id: query.category_id,
        active_on: query.active_only.then(|| Utc::now().date_naive()),
    };

    let budgets = state.store.list_budgets(current.id, filter).await?;
    let transactions = expense_transactions(&state, current.id).await?;
    let categories = state.store.list_categories(current.id).await?;

    let budgets = budgets
        .iter()
        .map(|b| decorate_budget(b, &transactions, &categories))
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(Json(json!({ "budgets": budgets })))
}

/// Gets one budget by ID, with spending figures attached.
pub async fn get_budget<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let budget = state
        .store
        .get_budget(id, current.id)
        .await?
        .ok_or_else(budget_not_found)?;

    let transactions = expense_transactions(&state, current.id).await?;
    let categories = state.store.list_categories(current.id).await?;

    Ok(Json(json!({
        "budget": decorate_budget(&budget, &transactions, &categories)?,
    })))
}

/// Creates a new budget for a category.
pub async fn create_budget<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBudgetRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let (category_id, amount, start_date, end_date) = match (
        request.category_id,
        request.amount,
        request.start_date,
        request.end_date,
    ) {
        (Some(category_id), Some(amount), Some(start), Some(end)) => {
            (category_id, amount, start, end)
        }
        _ => {
            return Err(ApiError::InvalidRequest(
                "Missing required fields".to_string(),
            ));
        }
    };

    if amount <= 0.0 {
        return Err(ApiError::InvalidRequest(
            "Amount must be positive".to_string(),
        ));
    }

    let start_date = parse_date(&start_date, "start_date")?;
    let end_date = parse_date(&end_date, "end_date")?;
    if end_date < start_date {
        return Err(ApiError::InvalidRequest(
            "End date must be after start date".to_string(),
        ));
    }

    state
        .store
        .get_category(category_id, current.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    let budget = Budget::new(amount, start_date, end_date, category_id, current.id);
    let budget = state.store.create_budget(budget).await?;

    tracing::info!(budget_id = %budget.id, user_id = %current.id, "Budget created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Budget created successfully",
            "budget": budget,
        })),
    ))
}

/// Updates a budget. Only supplied fields change, and the resulting
/// date range must stay well formed.
pub async fn update_budget<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBudgetRequest>,
) -> ApiResult<Json<Value>> {
    let mut budget = state
        .store
        .get_budget(id, current.id)
        .await?
        .ok_or_else(budget_not_found)?;

    if let Some(amount) = request.amount {
        if amount <= 0.0 {
            return Err(ApiError::InvalidRequest(
                "Amount must be positive".to_string(),
            ));
        }
        budget.amount = amount;
    }
    if let Some(start) = request.start_date {
        budget.start_date = parse_date(&start, "start_date")?;
    }
    if let Some(end) = request.end_date {
        budget.end_date = parse_date(&end, "end_date")?;
    }
    if budget.end_date < budget.start_date {
        return Err(ApiError::InvalidRequest(
            "End date must be after start date".to_string(),
        ));
    }
    if let Some(category_id) = request.category_id {
        state
            .store
            .get_category(category_id, current.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;
        budget.category_id = category_id;
    }

    budget.updated_at = Utc::now();
    let budget = state.store.update_budget(budget).await?;

    Ok(Json(json!({
        "message": "Budget updated successfully",
        "budget": budget,
    })))
}

/// Deletes a budget.
pub async fn delete_budget<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    state
        .store
        .get_budget(id, current.id)
        .await?
        .ok_or_else(budget_not_found)?;

    state.store.delete_budget(id, current.id).await?;

    Ok(Json(json!({ "message": "Budget deleted successfully" })))
}

/// Returns alerts for budgets that are near or over their limit today.
pub async fn get_alerts<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Value>> {
    let budgets = state
        .store
        .list_budgets(current.id, BudgetFilter::default())
        .await?;
    let transactions = expense_transactions(&state, current.id).await?;
    let categories = state.store.list_categories(current.id).await?;

    let alerts = evaluate_budgets(
        &budgets,
        &transactions,
        &categories,
        Utc::now().date_naive(),
    );

    Ok(Json(json!({ "alerts": alerts })))
}

async fn expense_transactions<S: FinanceStore>(
    state: &SharedState<S>,
    user_id: Uuid,
) -> ApiResult<Vec<Transaction>> {
    let filter = TransactionFilter {
        kind: Some(TransactionKind::Expense),
        ..Default::default()
    };
    Ok(state.store.list_transactions(user_id, filter).await?)
}
