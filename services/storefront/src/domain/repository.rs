#![allow(async_fn_in_trait)]

use wafi_domain::id::{OrderId, ProductId, UserId};
use wafi_domain::order::OrderStatus;
use wafi_domain::pagination::PageRequest;
use wafi_domain::product::ProductStatus;

use crate::domain::types::{
    Notification, NotificationSortBy, Order, Product, ProductDraft, ProductFilter, Reservation,
    ReserveOutcome, StockChange, StockWrite, User,
};
use crate::error::StorefrontError;

/// Repository for customer and admin accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StorefrontError>;

    /// Lookup by normalized (trimmed, lower-cased) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorefrontError>;

    async fn list(&self) -> Result<Vec<User>, StorefrontError>;

    /// Insert a new account. Returns `false` if the email is already taken.
    async fn create(&self, user: &User) -> Result<bool, StorefrontError>;
}

/// Repository for catalog products.
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StorefrontError>;

    /// Fetch several products at once. Unknown ids are skipped.
    async fn find_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, StorefrontError>;

    /// Products admitted by the filter, oldest first. `None` returns every match.
    async fn list(
        &self,
        filter: &ProductFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Product>, StorefrontError>;

    async fn create(&self, draft: &ProductDraft) -> Result<Product, StorefrontError>;

    async fn set_status(
        &self,
        id: ProductId,
        status: ProductStatus,
    ) -> Result<Option<Product>, StorefrontError>;

    /// Remove the row. Reservations go with it through the foreign key.
    async fn delete(&self, id: ProductId) -> Result<bool, StorefrontError>;

    async fn count(&self) -> Result<u64, StorefrontError>;

    /// Bulk insert used for catalog seeding. Returns the number of rows written.
    async fn insert_many(&self, drafts: &[ProductDraft]) -> Result<u64, StorefrontError>;
}

/// Repository for placed orders.
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: &Order) -> Result<(), StorefrontError>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StorefrontError>;

    /// Newest first. `user_id` restricts the listing to one customer.
    async fn list(
        &self,
        user_id: Option<UserId>,
        page: PageRequest,
    ) -> Result<Vec<Order>, StorefrontError>;

    async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, StorefrontError>;
}

/// Repository for back-in-stock reservations.
pub trait ReservationRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Reservation>, StorefrontError>;

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Reservation>, StorefrontError>;

    /// Atomically remove and return every reservation for a product.
    async fn take_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Reservation>, StorefrontError>;
}

/// Writes that must see a product's stock and its reservations together.
///
/// Each call is one transaction holding the product row lock, so a restock
/// and a reservation never interleave.
pub trait StockRepository: Send + Sync {
    /// Apply `change` and, when stock goes from none to some, drain the
    /// product's reservations into one unread notification each. Nothing is
    /// written if any step fails. `None` if the product does not exist.
    async fn write(
        &self,
        id: ProductId,
        change: &StockChange,
    ) -> Result<Option<StockWrite>, StorefrontError>;

    /// Reserve an out-of-stock product for `user_id`. Idempotent.
    async fn reserve(
        &self,
        product_id: ProductId,
        user_id: UserId,
    ) -> Result<ReserveOutcome, StorefrontError>;
}

/// Repository for per-user restock notifications.
pub trait NotificationRepository: Send + Sync {
    async fn list(
        &self,
        user_id: UserId,
        sort_by: NotificationSortBy,
        page: PageRequest,
    ) -> Result<Vec<Notification>, StorefrontError>;

    async fn count_unread(&self, user_id: UserId) -> Result<u64, StorefrontError>;

    /// Returns the number of notifications flipped to read.
    async fn mark_all_read(&self, user_id: UserId) -> Result<u64, StorefrontError>;
}

/// Password hashing, kept behind a port so usecases stay testable.
pub trait PasswordHasherPort: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, StorefrontError>;

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, StorefrontError>;
}
