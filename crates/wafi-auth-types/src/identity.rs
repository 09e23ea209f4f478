//! Bearer-token identity extractor.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::header::AUTHORIZATION;
use http::request::Parts;

use wafi_core::error::AppError;
use wafi_domain::id::UserId;
use wafi_domain::user::UserRole;

use crate::token::validate_token;

/// HMAC secret used to validate bearer tokens. Exposed to the extractor
/// through `FromRef` on the router state.
#[derive(Clone)]
pub struct JwtSecret(pub Arc<str>);

impl JwtSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }
}

/// Caller identity taken from `Authorization: Bearer <jwt>`.
///
/// Rejects with 401 when the header is missing or the token does not
/// validate. Role checks (403) are done by handlers after extraction.
/// Use `Option<Identity>` on routes that also serve anonymous callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Owner-or-admin rule for per-user resources.
    pub fn can_access(&self, owner: UserId) -> bool {
        self.user_id == owner || self.is_admin()
    }
}

fn identity_from_parts(parts: &Parts, secret: &str) -> Result<Identity, AppError> {
    let Authorization(bearer) = parts
        .headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::Unauthorized)?;
    let info = validate_token(bearer.token(), secret).map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        AppError::Unauthorized
    })?;
    Ok(Identity {
        user_id: info.user_id,
        role: info.role,
    })
}

impl<S> FromRequestParts<S> for Identity
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    // Extract synchronously and hand back a 'static future; an `async fn`
    // here trips E0195 against axum-core's `impl Future + Send` signature.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let result = identity_from_parts(parts, &secret.0);
        async move { result }
    }
}

impl<S> OptionalFromRequestParts<S> for Identity
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    /// Absent header means anonymous; a present but invalid token is still 401.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let result = if parts.headers.contains_key(AUTHORIZATION) {
            let secret = JwtSecret::from_ref(state);
            identity_from_parts(parts, &secret.0).map(Some)
        } else {
            Ok(None)
        };
        async move { result }
    }
}
