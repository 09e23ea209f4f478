use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wafi_auth_types::identity::Identity;
use wafi_domain::id::{ProductId, UserId};

use crate::domain::types::Reservation;
use crate::error::StorefrontError;
use crate::handlers::require_admin;
use crate::state::AppState;
use crate::usecase::reservation::{
    ClearReservationsUseCase, ListReservationsUseCase, ReserveProductUseCase,
};

#[derive(Serialize)]
pub struct ReservationResponse {
    pub product_id: ProductId,
    pub user_id: UserId,
    #[serde(serialize_with = "wafi_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            product_id: reservation.product_id,
            user_id: reservation.user_id,
            created_at: reservation.created_at,
        }
    }
}

fn reservation_list(reservations: Vec<Reservation>) -> Json<Vec<ReservationResponse>> {
    Json(
        reservations
            .into_iter()
            .map(ReservationResponse::from)
            .collect(),
    )
}

// ── POST /api/reservations ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ReserveRequest {
    pub product_id: ProductId,
}

/// 201 for a new reservation, 200 when the caller already had one.
pub async fn create_reservation(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<ReserveRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), StorefrontError> {
    let usecase = ReserveProductUseCase {
        stock: state.stock_repo(),
    };
    let out = usecase.execute(body.product_id, identity.user_id).await?;
    let status = if out.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(out.reservation.into())))
}

// ── GET /api/reservations ────────────────────────────────────────────────────

pub async fn list_reservations(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReservationResponse>>, StorefrontError> {
    require_admin(&identity)?;
    let usecase = ListReservationsUseCase {
        repo: state.reservation_repo(),
    };
    Ok(reservation_list(usecase.execute(None).await?))
}

// ── GET /api/reservations/user/{user_id} ─────────────────────────────────────

pub async fn list_user_reservations(
    identity: Identity,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<ReservationResponse>>, StorefrontError> {
    if !identity.can_access(user_id) {
        return Err(StorefrontError::Forbidden);
    }
    let usecase = ListReservationsUseCase {
        repo: state.reservation_repo(),
    };
    Ok(reservation_list(usecase.execute(Some(user_id)).await?))
}

// ── DELETE /api/reservations/product/{product_id} ────────────────────────────

#[derive(Serialize)]
pub struct RemovedResponse {
    pub removed: usize,
}

pub async fn clear_product_reservations(
    identity: Identity,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<RemovedResponse>, StorefrontError> {
    require_admin(&identity)?;
    let usecase = ClearReservationsUseCase {
        repo: state.reservation_repo(),
    };
    let removed = usecase.execute(product_id).await?;
    Ok(Json(RemovedResponse { removed }))
}
