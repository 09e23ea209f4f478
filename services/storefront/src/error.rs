use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use wafi_domain::id::ProductId;

use crate::domain::types::FieldError;

/// Storefront service error variants.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("user not found")]
    UserNotFound,
    #[error("product not found")]
    ProductNotFound,
    #[error("order not found")]
    OrderNotFound,
    #[error("user with this email already exists")]
    UserAlreadyExists,
    #[error("product is in stock")]
    ProductInStock,
    #[error("product {0} is not available")]
    ProductUnavailable(ProductId),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("order has no items")]
    EmptyOrder,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl StorefrontError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::ProductInStock => "PRODUCT_IN_STOCK",
            Self::ProductUnavailable(_) => "PRODUCT_UNAVAILABLE",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::EmptyOrder => "EMPTY_ORDER",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// `Ok(())` for an empty error list, `Validation` otherwise.
    pub fn check(errors: Vec<FieldError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self::Validation(errors))
        }
    }
}

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound | Self::ProductNotFound | Self::OrderNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::UserAlreadyExists | Self::ProductInStock | Self::ProductUnavailable(_) => {
                StatusCode::CONFLICT
            }
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::EmptyOrder => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(errors) = &self {
            body["errors"] = serde_json::json!(errors);
        }
        (status, axum::Json(body)).into_response()
    }
}
