//! Fintrack HTTP server.
//!
//! Wires the store, authentication, and report crates into an axum
//! application serving the personal finance API.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

use auth::{JwtConfig, JwtManager};
use axum::Router;
use finance_store::FinanceStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::SharedState;

/// Builds shared application state from configuration and a store.
pub fn create_state<S: FinanceStore>(config: Config, store: S) -> SharedState<S> {
    let jwt_config = JwtConfig::new(config.jwt_secret.clone())
        .with_access_token_hours(config.access_token_hours)
        .with_refresh_token_days(config.refresh_token_days);
    state::create_shared_state(config, store, JwtManager::new(jwt_config))
}

/// Builds the axum application with tracing and CORS layers.
pub fn create_app<S: FinanceStore + 'static>(state: SharedState<S>) -> Router {
    api::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the
/// configured default level.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
pub(crate) mod test_utils {
    use entities::{Category, User};
    use finance_store::FinanceStore;

    use super::*;
    use crate::middleware::AuthenticatedUser;

    pub fn test_state<S: FinanceStore>(store: S) -> SharedState<S> {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            access_token_hours: 1,
            refresh_token_days: 30,
            log_level: "debug".to_string(),
        };
        let jwt_manager = JwtManager::new(JwtConfig::new("test-secret"));
        state::create_shared_state(config, store, jwt_manager)
    }

    pub async fn register_user<S: FinanceStore>(
        state: &SharedState<S>,
        username: &str,
        email: &str,
    ) -> AuthenticatedUser {
        let hash = auth::hash_password("password123").unwrap();
        let user = User::new(username.to_string(), email.to_string(), hash);
        let user = state.store.create_user(user).await.unwrap();
        AuthenticatedUser {
            id: user.id,
            username: user.username,
        }
    }

    pub async fn create_category_for<S: FinanceStore>(
        state: &SharedState<S>,
        user: &AuthenticatedUser,
        name: &str,
    ) -> Category {
        let category = Category::new(name.to_string(), user.id);
        state.store.create_category(category).await.unwrap()
    }
}
