use wafi_domain::id::ProductId;

use crate::model::FieldMessage;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("{status} {kind}: {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
        errors: Vec<FieldMessage>,
    },

    /// Rejected locally before any request was sent.
    #[error("invalid form: {}", fields(.0))]
    Validation(Vec<FieldMessage>),

    #[error("product {0} is not available")]
    ProductUnavailable(ProductId),

    #[error("sign in first")]
    NotSignedIn,
}

fn fields(errors: &[FieldMessage]) -> String {
    errors
        .iter()
        .map(|e| e.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ClientError {
    /// Service error kind, e.g. `PRODUCT_IN_STOCK`.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Api { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Field messages from local or server-side validation.
    pub fn field_errors(&self) -> &[FieldMessage] {
        match self {
            Self::Api { errors, .. } | Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}
