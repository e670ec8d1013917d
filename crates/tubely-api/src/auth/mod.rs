//! Bearer-token authentication.

pub mod jwt;
pub mod models;

pub use jwt::{make_jwt, validate_jwt, AuthError, JwtClaims};
pub use models::AuthUser;
