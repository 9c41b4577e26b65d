//! JWT token generation and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AuthError, AuthResult, DEFAULT_ACCESS_TOKEN_HOURS, DEFAULT_JWT_ISSUER,
    DEFAULT_REFRESH_TOKEN_DAYS,
};

/// What a token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    /// Short-lived token sent with every API request.
    Access,
    /// Long-lived token exchanged for fresh access tokens.
    Refresh,
}

/// JWT claims for Fintrack tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Login name.
    pub username: String,
    /// Access or refresh.
    #[serde(rename = "use")]
    pub token_use: TokenUse,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// JWT ID.
    pub jti: String,
}

impl Claims {
    /// Creates new claims for a user.
    pub fn new(user_id: Uuid, username: String, token_use: TokenUse, lifetime: Duration) -> Self {
        let now = Utc::now();
        let exp = now + lifetime;

        Self {
            sub: user_id.to_string(),
            username,
            token_use,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: DEFAULT_JWT_ISSUER.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Returns the user ID.
    pub fn user_id(&self) -> AuthResult<Uuid> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token lifetime in hours.
    pub access_token_hours: u64,
    /// Refresh token lifetime in days.
    pub refresh_token_days: u64,
    /// Token issuer.
    pub issuer: String,
}

impl JwtConfig {
    /// Creates a new JWT configuration.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_hours: DEFAULT_ACCESS_TOKEN_HOURS,
            refresh_token_days: DEFAULT_REFRESH_TOKEN_DAYS,
            issuer: DEFAULT_JWT_ISSUER.to_string(),
        }
    }

    /// Sets the access token lifetime in hours.
    pub fn with_access_token_hours(mut self, hours: u64) -> Self {
        self.access_token_hours = hours;
        self
    }

    /// Sets the refresh token lifetime in days.
    pub fn with_refresh_token_days(mut self, days: u64) -> Self {
        self.refresh_token_days = days;
        self
    }
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("config", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    /// Creates a new JWT manager.
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates an access token for a user.
    pub fn generate_access_token(&self, user_id: Uuid, username: &str) -> AuthResult<String> {
        self.generate_token(
            user_id,
            username,
            TokenUse::Access,
            Duration::hours(self.config.access_token_hours as i64),
        )
    }

    /// Generates a refresh token for a user.
    pub fn generate_refresh_token(&self, user_id: Uuid, username: &str) -> AuthResult<String> {
        self.generate_token(
            user_id,
            username,
            TokenUse::Refresh,
            Duration::days(self.config.refresh_token_days as i64),
        )
    }

    fn generate_token(
        &self,
        user_id: Uuid,
        username: &str,
        token_use: TokenUse,
        lifetime: Duration,
    ) -> AuthResult<String> {
        let claims = Claims::new(user_id, username.to_string(), token_use, lifetime);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::JwtEncoding(e.to_string()))
    }

    /// Validates a token and checks that it is usable as `expected`.
    ///
    /// A refresh token is never accepted where an access token is required,
    /// and vice versa.
    pub fn validate_token(&self, token: &str, expected: TokenUse) -> AuthResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        if token_data.claims.token_use != expected {
            return Err(AuthError::WrongTokenUse);
        }

        Ok(token_data.claims)
    }
}
