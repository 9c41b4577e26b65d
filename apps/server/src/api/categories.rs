//! Category API endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use entities::Category;
use finance_store::FinanceStore;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthenticatedUser;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

fn category_not_found() -> ApiError {
    ApiError::NotFound("Category not found".to_string())
}

/// Lists the user's categories.
pub async fn list_categories<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Value>> {
    let categories = state.store.list_categories(current.id).await?;

    Ok(Json(json!({ "categories": categories })))
}

/// Gets one category by ID.
pub async fn get_category<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let category = state
        .store
        .get_category(id, current.id)
        .await?
        .ok_or_else(category_not_found)?;

    Ok(Json(json!({ "category": category })))
}

/// Creates a new category.
pub async fn create_category<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let name = match request.name {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(ApiError::InvalidRequest(
                "Missing required fields".to_string(),
            ));
        }
    };

    let mut category = Category::new(name, current.id);
    if let Some(description) = request.description {
        category = category.with_description(description);
    }
    if let Some(color) = request.color {
        category = category.with_color(color);
    }

    let category = state.store.create_category(category).await?;

    tracing::info!(category_id = %category.id, user_id = %current.id, "Category created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Category created successfully",
            "category": category,
        })),
    ))
}

/// Updates a category. Only supplied fields change.
pub async fn update_category<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCategoryRequest>,
) -> ApiResult<Json<Value>> {
    let mut category = state
        .store
        .get_category(id, current.id)
        .await?
        .ok_or_else(category_not_found)?;

    if let Some(name) = request.name {
        if !name.is_empty() {
            category.name = name;
        }
    }
    if let Some(description) = request.description {
        category.description = description;
    }
    if let Some(color) = request.color {
        if !color.is_empty() {
            category.color = color;
        }
    }

    category.updated_at = Utc::now();
    let category = state.store.update_category(category).await?;

    Ok(Json(json!({
        "message": "Category updated successfully",
        "category": category,
    })))
}

/// Deletes a category.
pub async fn delete_category<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    state
        .store
        .get_category(id, current.id)
        .await?
        .ok_or_else(category_not_found)?;

    state.store.delete_category(id, current.id).await?;

    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
