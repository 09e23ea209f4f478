pub mod notification;
pub mod order;
pub mod product;
pub mod reservation;
pub mod user;

use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;

use wafi_auth_types::identity::Identity;
use wafi_core::error::AppError;
use wafi_core::health::ServiceInfo;
use wafi_domain::pagination::PageRequest;

use crate::error::StorefrontError;
use crate::state::AppState;

/// 403 unless the caller is an admin.
pub fn require_admin(identity: &Identity) -> Result<(), StorefrontError> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(StorefrontError::Forbidden)
    }
}

/// `?page=&per-page=` on list endpoints.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct PageQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

impl PageQuery {
    pub fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            per_page: self.per_page.unwrap_or(defaults.per_page),
            page: self.page.unwrap_or(defaults.page),
        }
    }

    /// `None` when the caller asked for no paging at all.
    pub fn requested(&self) -> Option<PageRequest> {
        (self.per_page.is_some() || self.page.is_some()).then(|| self.page_request())
    }
}

const SERVICE: ServiceInfo = ServiceInfo {
    service: "storefront",
    version: env!("CARGO_PKG_VERSION"),
};

/// Handler for `GET /healthz`.
pub async fn healthz() -> Response {
    SERVICE.live()
}

/// Handler for `GET /readyz`: ready once the database answers a ping.
pub async fn readyz(State(state): State<AppState>) -> Result<Response, AppError> {
    SERVICE.ready("database", state.db.ping().await)
}
