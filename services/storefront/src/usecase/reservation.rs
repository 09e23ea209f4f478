use tracing::info;

use wafi_domain::id::{ProductId, UserId};

use crate::domain::repository::{ReservationRepository, StockRepository};
use crate::domain::types::{Reservation, ReserveOutcome};
use crate::error::StorefrontError;

// ── ReserveProduct ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ReserveOutput {
    pub reservation: Reservation,
    /// `false` when the customer had already reserved this product.
    pub created: bool,
}

pub struct ReserveProductUseCase<S: StockRepository> {
    pub stock: S,
}

impl<S: StockRepository> ReserveProductUseCase<S> {
    pub async fn execute(
        &self,
        product_id: ProductId,
        user_id: UserId,
    ) -> Result<ReserveOutput, StorefrontError> {
        match self.stock.reserve(product_id, user_id).await? {
            ReserveOutcome::Created(reservation) => {
                info!(product_id = %product_id, user_id = %user_id, "reservation created");
                Ok(ReserveOutput {
                    reservation,
                    created: true,
                })
            }
            ReserveOutcome::AlreadyReserved(reservation) => Ok(ReserveOutput {
                reservation,
                created: false,
            }),
            ReserveOutcome::InStock => Err(StorefrontError::ProductInStock),
            ReserveOutcome::Missing => Err(StorefrontError::ProductNotFound),
        }
    }
}

// ── ListReservations ─────────────────────────────────────────────────────────

pub struct ListReservationsUseCase<R: ReservationRepository> {
    pub repo: R,
}

impl<R: ReservationRepository> ListReservationsUseCase<R> {
    /// Every reservation when `user_id` is `None`, otherwise that customer's.
    pub async fn execute(&self, user_id: Option<UserId>) -> Result<Vec<Reservation>, StorefrontError> {
        match user_id {
            Some(user_id) => self.repo.list_by_user(user_id).await,
            None => self.repo.list().await,
        }
    }
}

// ── ClearReservations ────────────────────────────────────────────────────────

pub struct ClearReservationsUseCase<R: ReservationRepository> {
    pub repo: R,
}

impl<R: ReservationRepository> ClearReservationsUseCase<R> {
    /// Drop a product's reservations without notifying anyone.
    pub async fn execute(&self, product_id: ProductId) -> Result<usize, StorefrontError> {
        let removed = self.repo.take_for_product(product_id).await?.len();
        info!(product_id = %product_id, removed, "reservations cleared");
        Ok(removed)
    }
}
