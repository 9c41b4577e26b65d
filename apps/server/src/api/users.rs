//! User profile API endpoints.

use axum::{Extension, Json, extract::State};
use chrono::Utc;
use finance_store::FinanceStore;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthenticatedUser;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Returns the authenticated user's profile.
pub async fn get_me<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Value>> {
    let user = state
        .store
        .get_user(current.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({ "user": user })))
}

/// Updates the authenticated user's profile. Only supplied fields change.
pub async fn update_me<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Value>> {
    let mut user = state
        .store
        .get_user(current.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if let Some(username) = request.username {
        if !username.is_empty() && username != user.username {
            if state.store.get_user_by_username(&username).await?.is_some() {
                return Err(ApiError::Conflict("Username already exists".to_string()));
            }
            user.username = username;
        }
    }

    if let Some(email) = request.email {
        if !email.is_empty() && email != user.email {
            if state.store.get_user_by_email(&email).await?.is_some() {
                return Err(ApiError::Conflict("Email already exists".to_string()));
            }
            user.email = email;
        }
    }

    if let Some(password) = request.password {
        if !password.is_empty() {
            user.password_hash = auth::hash_password(&password)?;
        }
    }

    user.updated_at = Utc::now();
    let user = state.store.update_user(user).await?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": user,
    })))
}

/// Changes the authenticated user's password after verifying the current one.
pub async fn change_password<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<Json<Value>> {
    let (current_password, new_password) = match (request.current_password, request.new_password) {
        (Some(current), Some(new)) if !current.is_empty() && !new.is_empty() => (current, new),
        _ => {
            return Err(ApiError::InvalidRequest(
                "Missing current_password or new_password".to_string(),
            ));
        }
    };

    let mut user = state
        .store
        .get_user(current.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    auth::verify_password(&current_password, &user.password_hash)
        .map_err(|_| ApiError::Unauthorized("Current password is incorrect".to_string()))?;

    user.password_hash = auth::hash_password(&new_password)?;
    user.updated_at = Utc::now();
    state.store.update_user(user).await?;

    tracing::info!(user_id = %current.id, "Password changed");

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

#[cfg(test)]
mod tests {
    use entities::User;
    use finance_store::MemoryStore;

    use super::*;
    use crate::test_utils::{register_user, test_state};

    #[tokio::test]
    async fn test_get_me_returns_profile() {
        let state = test_state(MemoryStore::new());
        let current = register_user(&state, "alice", "alice@example.com").await;

        let body = get_me(State(state), Extension(current)).await.unwrap();
        assert_eq!(body["user"]["username"], "alice");
    }

    #[tokio::test]
    async fn test_update_me_partial() {
        let state = test_state(MemoryStore::new());
        let current = register_user(&state, "alice", "alice@example.com").await;

        let body = update_me(
            State(state.clone()),
            Extension(current),
            Json(UpdateProfileRequest {
                username: None,
                email: Some("new@example.com".to_string()),
                password: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(body["user"]["username"], "alice");
        assert_eq!(body["user"]["email"], "new@example.com");
    }

    #[tokio::test]
    async fn test_update_me_taken_username_conflicts() {
        let state = test_state(MemoryStore::new());
        let current = register_user(&state, "alice", "alice@example.com").await;
        state
            .store
            .create_user(User::new("bob", "bob@example.com", "hash"))
            .await
            .unwrap();

        let err = update_me(
            State(state),
            Extension(current),
            Json(UpdateProfileRequest {
                username: Some("bob".to_string()),
                email: None,
                password: None,
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Conflict(msg) if msg == "Username already exists"));
    }

    #[tokio::test]
    async fn test_change_password_requires_current() {
        let state = test_state(MemoryStore::new());
        let current = register_user(&state, "alice", "alice@example.com").await;

        let err = change_password(
            State(state.clone()),
            Extension(current.clone()),
            Json(ChangePasswordRequest {
                current_password: Some("wrongpassword".to_string()),
                new_password: Some("newpassword".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(msg) if msg == "Current password is incorrect"));

        let body = change_password(
            State(state),
            Extension(current),
            Json(ChangePasswordRequest {
                current_password: Some("password123".to_string()),
                new_password: Some("newpassword".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(body["message"], "Password changed successfully");
    }
}
