use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use wafi_auth_types::identity::JwtSecret;
use wafi_domain::id::{OrderId, ProductId, UserId};
use wafi_domain::order::OrderStatus;
use wafi_domain::pagination::{PageRequest, Sort};
use wafi_domain::product::ProductStatus;
use wafi_domain::user::UserRole;
use wafi_storefront::domain::handoff::WhatsAppHandoff;
use wafi_storefront::domain::repository::{
    NotificationRepository, OrderRepository, PasswordHasherPort, ProductRepository,
    ReservationRepository, StockRepository, UserRepository,
};
use wafi_storefront::domain::types::{
    CustomerContact, Notification, NotificationSortBy, Order, Product, ProductDraft,
    ProductFilter, Reservation, ReserveOutcome, StockChange, StockWrite, User, is_restock,
    restock_notifications,
};
use wafi_storefront::error::StorefrontError;
use wafi_storefront::usecase::user::TokenSettings;
use wafi_testing::auth::TEST_JWT_SECRET;

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect()
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(role: UserRole) -> User {
    let id = UserId::generate();
    User {
        id,
        email: format!("{}@example.sn", id.0.simple()),
        password_hash: PlainHasher::encode("secret1"),
        first_name: "Awa".to_string(),
        last_name: "Diop".to_string(),
        role,
        created_at: Utc::now(),
    }
}

pub fn test_product(id: i32, name: &str, stock: i32, status: ProductStatus) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_string(),
        price: 12_500,
        image_urls: vec![format!("https://img.example/{id}.jpg")],
        description: String::new(),
        category: "Produits de Beauté".to_string(),
        stock,
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn draft(name: &str, stock: i32) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        price: 12_500,
        image_urls: vec!["https://img.example/p.jpg".to_string()],
        description: "Description".to_string(),
        category: "Produits de Beauté".to_string(),
        stock,
    }
}

pub fn contact() -> CustomerContact {
    CustomerContact {
        first_name: "Awa".to_string(),
        last_name: "Diop".to_string(),
        phone: "771234567".to_string(),
        address: Some("Dakar".to_string()),
    }
}

pub fn handoff() -> WhatsAppHandoff {
    WhatsAppHandoff {
        merchant_number: "221123456789".to_string(),
        public_base_url: "http://localhost:5002".to_string(),
        shop_name: "Belleza".to_string(),
    }
}

pub fn tokens() -> TokenSettings {
    TokenSettings {
        secret: JwtSecret::new(TEST_JWT_SECRET),
        ttl_secs: 600,
    }
}

// ── PlainHasher ──────────────────────────────────────────────────────────────

/// Reversible stand-in for argon2 so tests stay fast.
#[derive(Clone, Copy, Default)]
pub struct PlainHasher;

impl PlainHasher {
    pub fn encode(password: &str) -> String {
        format!("plain:{password}")
    }
}

impl PasswordHasherPort for PlainHasher {
    async fn hash(&self, password: &str) -> Result<String, StorefrontError> {
        Ok(Self::encode(password))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, StorefrontError> {
        Ok(Self::encode(password) == hash)
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StorefrontError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorefrontError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StorefrontError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create(&self, user: &User) -> Result<bool, StorefrontError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Ok(false);
        }
        users.push(user.clone());
        Ok(true)
    }
}

// ── MockProductRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockProductRepo {
    pub products: Arc<Mutex<Vec<Product>>>,
}

impl MockProductRepo {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(Mutex::new(products)),
        }
    }

    pub fn products_handle(&self) -> Arc<Mutex<Vec<Product>>> {
        Arc::clone(&self.products)
    }

    fn update_with(&self, id: ProductId, apply: impl FnOnce(&mut Product)) -> Option<Product> {
        let mut products = self.products.lock().unwrap();
        let product = products.iter_mut().find(|p| p.id == id)?;
        apply(product);
        product.updated_at = Utc::now();
        Some(product.clone())
    }

    fn insert_draft(products: &mut Vec<Product>, draft: &ProductDraft) -> Product {
        let next_id = products.iter().map(|p| p.id.0).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let product = Product {
            id: ProductId(next_id),
            name: draft.name.clone(),
            price: draft.price,
            image_urls: draft.image_urls.clone(),
            description: draft.description.clone(),
            category: draft.category.clone(),
            stock: draft.stock,
            status: ProductStatus::Active,
            created_at: now,
            updated_at: now,
        };
        products.push(product.clone());
        product
    }
}

impl ProductRepository for MockProductRepo {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StorefrontError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, StorefrontError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Product>, StorefrontError> {
        let matching: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| filter.visibility.admits(p.status))
            .filter(|p| filter.category.as_ref().is_none_or(|c| &p.category == c))
            .cloned()
            .collect();
        Ok(match page {
            Some(page) => page_of(&matching, page),
            None => matching,
        })
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, StorefrontError> {
        let mut products = self.products.lock().unwrap();
        Ok(Self::insert_draft(&mut products, draft))
    }

    async fn set_status(
        &self,
        id: ProductId,
        status: ProductStatus,
    ) -> Result<Option<Product>, StorefrontError> {
        Ok(self.update_with(id, |p| p.status = status))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StorefrontError> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }

    async fn count(&self) -> Result<u64, StorefrontError> {
        Ok(self.products.lock().unwrap().len() as u64)
    }

    async fn insert_many(&self, drafts: &[ProductDraft]) -> Result<u64, StorefrontError> {
        let mut products = self.products.lock().unwrap();
        for draft in drafts {
            Self::insert_draft(&mut products, draft);
        }
        Ok(drafts.len() as u64)
    }
}

// ── MockOrderRepo ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockOrderRepo {
    pub orders: Arc<Mutex<Vec<Order>>>,
}

impl MockOrderRepo {
    pub fn orders_handle(&self) -> Arc<Mutex<Vec<Order>>> {
        Arc::clone(&self.orders)
    }
}

impl OrderRepository for MockOrderRepo {
    async fn create(&self, order: &Order) -> Result<(), StorefrontError> {
        self.orders.lock().unwrap().push(order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StorefrontError> {
        Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn list(
        &self,
        user_id: Option<UserId>,
        page: PageRequest,
    ) -> Result<Vec<Order>, StorefrontError> {
        let mut matching: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| user_id.is_none() || o.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page_of(&matching, page))
    }

    async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, StorefrontError> {
        let mut orders = self.orders.lock().unwrap();
        Ok(orders.iter_mut().find(|o| o.id == id).map(|o| {
            o.status = status;
            o.clone()
        }))
    }
}

// ── MockReservationRepo ──────────────────────────────────────────────────────

/// Shares its notification list with `MockNotificationRepo::sharing`, the way
/// both tables live in one database.
#[derive(Clone, Default)]
pub struct MockReservationRepo {
    pub reservations: Arc<Mutex<Vec<Reservation>>>,
    pub notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MockReservationRepo {
    pub fn new(reservations: Vec<Reservation>) -> Self {
        Self {
            reservations: Arc::new(Mutex::new(reservations)),
            notifications: Arc::default(),
        }
    }

    pub fn reservations_handle(&self) -> Arc<Mutex<Vec<Reservation>>> {
        Arc::clone(&self.reservations)
    }

    pub fn notifications_handle(&self) -> Arc<Mutex<Vec<Notification>>> {
        Arc::clone(&self.notifications)
    }
}

impl ReservationRepository for MockReservationRepo {
    async fn list(&self) -> Result<Vec<Reservation>, StorefrontError> {
        Ok(self.reservations.lock().unwrap().clone())
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Reservation>, StorefrontError> {
        Ok(self
            .reservations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn take_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Reservation>, StorefrontError> {
        let mut reservations = self.reservations.lock().unwrap();
        let (taken, kept) = reservations
            .drain(..)
            .partition(|r| r.product_id == product_id);
        *reservations = kept;
        Ok(taken)
    }
}

// ── MockStockRepo ────────────────────────────────────────────────────────────

/// Works on the tables of a `MockProductRepo` and a `MockReservationRepo`.
/// Every call stages its changes and commits them only when nothing failed.
#[derive(Clone)]
pub struct MockStockRepo {
    pub products: Arc<Mutex<Vec<Product>>>,
    pub reservations: Arc<Mutex<Vec<Reservation>>>,
    pub notifications: Arc<Mutex<Vec<Notification>>>,
    notify_fails: Arc<AtomicBool>,
}

impl MockStockRepo {
    pub fn sharing(products: &MockProductRepo, reservations: &MockReservationRepo) -> Self {
        Self {
            products: products.products_handle(),
            reservations: reservations.reservations_handle(),
            notifications: reservations.notifications_handle(),
            notify_fails: Arc::default(),
        }
    }

    /// Make the next notification insert fail, as a dropped connection would.
    pub fn fail_next_notify(&self) {
        self.notify_fails.store(true, Ordering::SeqCst);
    }
}

impl StockRepository for MockStockRepo {
    async fn write(
        &self,
        id: ProductId,
        change: &StockChange,
    ) -> Result<Option<StockWrite>, StorefrontError> {
        let mut products = self.products.lock().unwrap();
        let Some(row) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        let stock_before = row.stock;
        let mut product = row.clone();
        change.apply_to(&mut product);
        product.updated_at = Utc::now();

        let mut reservations = self.reservations.lock().unwrap();
        let mut kept = reservations.clone();
        let mut created = Vec::new();
        if is_restock(stock_before, product.stock) {
            let (waiting, rest): (Vec<Reservation>, Vec<Reservation>) =
                kept.into_iter().partition(|r| r.product_id == id);
            created = restock_notifications(&product, &waiting, Utc::now());
            kept = rest;
            if !created.is_empty() && self.notify_fails.swap(false, Ordering::SeqCst) {
                return Err(anyhow::anyhow!("insert notifications: connection reset").into());
            }
        }

        *row = product.clone();
        *reservations = kept;
        self.notifications
            .lock()
            .unwrap()
            .extend(created.iter().cloned());
        Ok(Some(StockWrite {
            product,
            stock_before,
            notifications: created,
        }))
    }

    async fn reserve(
        &self,
        product_id: ProductId,
        user_id: UserId,
    ) -> Result<ReserveOutcome, StorefrontError> {
        let products = self.products.lock().unwrap();
        let Some(product) = products
            .iter()
            .find(|p| p.id == product_id && p.status != ProductStatus::Deleted)
        else {
            return Ok(ReserveOutcome::Missing);
        };
        if product.in_stock() {
            return Ok(ReserveOutcome::InStock);
        }

        let mut reservations = self.reservations.lock().unwrap();
        if let Some(existing) = reservations
            .iter()
            .find(|r| r.product_id == product_id && r.user_id == user_id)
        {
            return Ok(ReserveOutcome::AlreadyReserved(existing.clone()));
        }
        let reservation = Reservation {
            product_id,
            user_id,
            created_at: Utc::now(),
        };
        reservations.push(reservation.clone());
        Ok(ReserveOutcome::Created(reservation))
    }
}

// ── MockNotificationRepo ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockNotificationRepo {
    pub notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MockNotificationRepo {
    pub fn sharing(reservations: &MockReservationRepo) -> Self {
        Self {
            notifications: reservations.notifications_handle(),
        }
    }
}

impl NotificationRepository for MockNotificationRepo {
    async fn list(
        &self,
        user_id: UserId,
        sort_by: NotificationSortBy,
        page: PageRequest,
    ) -> Result<Vec<Notification>, StorefrontError> {
        let mut matching: Vec<Notification> = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        match sort_by {
            NotificationSortBy::CreatedAt(Sort::Desc) => {
                matching.sort_by(|a, b| b.created_at.cmp(&a.created_at))
            }
            NotificationSortBy::CreatedAt(Sort::Asc) => {
                matching.sort_by(|a, b| a.created_at.cmp(&b.created_at))
            }
        }
        Ok(page_of(&matching, page))
    }

    async fn count_unread(&self, user_id: UserId) -> Result<u64, StorefrontError> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .count() as u64)
    }

    async fn mark_all_read(&self, user_id: UserId) -> Result<u64, StorefrontError> {
        let mut updated = 0;
        for n in self.notifications.lock().unwrap().iter_mut() {
            if n.user_id == user_id && !n.read {
                n.read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }
}
