use std::fmt::Display;

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::AppError;

/// Name and build version a service reports on `/healthz` and `/readyz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    #[serde(flatten)]
    info: ServiceInfo,
}

impl ServiceInfo {
    /// Liveness answer: the process is serving requests.
    pub fn live(self) -> Response {
        self.answer("ok")
    }

    /// Readiness answer for one dependency check. A failed check is logged
    /// with the dependency name and reported as `UNAVAILABLE`.
    pub fn ready<E: Display>(
        self,
        dependency: &'static str,
        check: Result<(), E>,
    ) -> Result<Response, AppError> {
        check.map_err(|e| {
            tracing::warn!(
                service = self.service,
                dependency,
                error = %e,
                "readiness check failed"
            );
            AppError::Unavailable
        })?;
        Ok(self.answer("ready"))
    }

    fn answer(self, status: &'static str) -> Response {
        Json(HealthBody { status, info: self }).into_response()
    }
}
