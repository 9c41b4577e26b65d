//! Authentication API endpoints.

use axum::{Json, extract::State, http::StatusCode};
use auth::TokenUse;
use entities::User;
use finance_store::FinanceStore;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

fn required(field: Option<String>) -> ApiResult<String> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::InvalidRequest(
            "Missing required fields".to_string(),
        )),
    }
}

/// Registers a new user.
pub async fn register<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let username = required(request.username)?;
    let email = required(request.email)?;
    let password = required(request.password)?;

    if state.store.get_user_by_username(&username).await?.is_some() {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }
    if state.store.get_user_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = auth::hash_password(&password)?;
    let user = state
        .store
        .create_user(User::new(username, email, password_hash))
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": user,
        })),
    ))
}

/// Logs a user in and issues access and refresh tokens.
pub async fn login<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let username = required(request.username)?;
    let password = required(request.password)?;

    // A missing user and a wrong password produce the same response.
    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    let user = state
        .store
        .get_user_by_username(&username)
        .await?
        .ok_or_else(invalid)?;

    auth::verify_password(&password, &user.password_hash).map_err(|_| invalid())?;

    let access_token = state
        .jwt_manager
        .generate_access_token(user.id, &user.username)?;
    let refresh_token = state
        .jwt_manager
        .generate_refresh_token(user.id, &user.username)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(json!({
        "message": "Login successful",
        "access_token": access_token,
        "refresh_token": refresh_token,
        "user": user,
    })))
}

/// Exchanges a refresh token for a fresh access token.
pub async fn refresh<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<Json<Value>> {
    let token = required(request.refresh_token)?;

    let claims = state
        .jwt_manager
        .validate_token(&token, TokenUse::Refresh)?;
    let user_id = claims.user_id()?;

    // The account must still exist.
    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or(ApiError::AuthenticationRequired)?;

    let access_token = state
        .jwt_manager
        .generate_access_token(user.id, &user.username)?;

    Ok(Json(json!({ "access_token": access_token })))
}
