//! Authentication middleware.

use std::sync::Arc;

use auth::{Claims, TokenUse};
use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use finance_store::FinanceStore;
use serde_json::json;
use uuid::Uuid;

use crate::state::AppState;

/// Authenticated user information, extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User ID.
    pub id: Uuid,
    /// Login name.
    pub username: String,
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = auth::AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.user_id()?,
            username: claims.username,
        })
    }
}

/// Extracts the JWT token from the Authorization header.
fn extract_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
}

/// Authentication middleware.
///
/// Extracts the bearer token from the Authorization header, validates it as
/// an access token, and stores the authenticated user in the request
/// extensions for handlers to pick up.
pub async fn auth_middleware<S: FinanceStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_token(&request) {
        Some(token) => token,
        None => return unauthorized("Missing authorization header"),
    };

    let claims = match state.jwt_manager.validate_token(token, TokenUse::Access) {
        Ok(claims) => claims,
        Err(_) => return unauthorized("Invalid or expired token"),
    };

    match AuthenticatedUser::try_from(claims) {
        Ok(user) => {
            request.extensions_mut().insert(user);
        }
        Err(_) => return unauthorized("Invalid token claims"),
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_authenticated_user_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(
            user_id,
            "alice".to_string(),
            TokenUse::Access,
            Duration::hours(1),
        );

        let user = AuthenticatedUser::try_from(claims).unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_bearer_prefix_required() {
        let auth_header = "Basic credentials";
        assert_eq!(auth_header.strip_prefix("Bearer "), None);

        let auth_header = "Bearer token-123";
        assert_eq!(auth_header.strip_prefix("Bearer "), Some("token-123"));
    }
}
