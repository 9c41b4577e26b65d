//! Authentication for Fintrack.
//!
//! This crate provides:
//! - JWT access and refresh token generation and validation
//! - Argon2 password hashing and verification

mod error;
mod jwt;
mod password;

pub use error::*;
pub use jwt::*;
pub use password::*;

/// Default access token expiration time in hours.
pub const DEFAULT_ACCESS_TOKEN_HOURS: u64 = 1;

/// Default refresh token expiration time in days.
pub const DEFAULT_REFRESH_TOKEN_DAYS: u64 = 30;

/// Default JWT issuer.
pub const DEFAULT_JWT_ISSUER: &str = "fintrack";
