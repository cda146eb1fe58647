use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::users::cookie::extract_session_token;
use crate::users::jwt::JwtKeys;

/// Extracts and validates the session cookie, returning the user ID.
pub struct SessionUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let token = extract_session_token(&parts.headers).ok_or_else(|| {
            ApiError::Authentication("Not authorized, please login".to_string())
        })?;

        let claims = keys.verify(&token).map_err(|_| {
            warn!("invalid or expired session token");
            ApiError::Authentication("Not authorized, please login".to_string())
        })?;

        Ok(SessionUser(claims.sub))
    }
}
