use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wafi_domain::id::{NotificationId, OrderId, ProductId, UserId};
use wafi_domain::order::OrderStatus;
use wafi_domain::pagination::Sort;
use wafi_domain::product::{ProductStatus, ProductVisibility, category_rank};
use wafi_domain::user::UserRole;
use wafi_domain::validate::{is_person_name, is_phone_number};

/// Account record, including the stored password hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Catalog product.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in FCFA.
    pub price: i64,
    pub image_urls: Vec<String>,
    pub description: String,
    pub category: String,
    pub stock: i32,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn first_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether a customer may put this product in an order right now.
    pub fn purchasable(&self) -> bool {
        self.status == ProductStatus::Active && self.in_stock()
    }
}

/// Editable product fields, used for creation, full edits and seeding.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub stock: i32,
}

impl ProductDraft {
    /// Trim text fields and drop blank image entries.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            price: self.price,
            image_urls: self
                .image_urls
                .into_iter()
                .map(|u| u.trim().to_owned())
                .filter(|u| !u.is_empty())
                .collect(),
            description: self.description.trim().to_owned(),
            category: self.category.trim().to_owned(),
            stock: self.stock,
        }
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "name is required"));
        }
        if self.category.trim().is_empty() {
            errors.push(FieldError::new("category", "category is required"));
        }
        if self.price < 0 {
            errors.push(FieldError::new("price", "price must not be negative"));
        }
        if self.stock < 0 {
            errors.push(FieldError::new("stock", "stock must not be negative"));
        }
        errors
    }
}

/// Filter for product listings.
#[derive(Debug, Clone)]
pub struct ProductFilter {
    pub visibility: ProductVisibility,
    pub category: Option<String>,
}

impl ProductFilter {
    pub fn storefront(category: Option<String>) -> Self {
        Self {
            visibility: ProductVisibility::Storefront,
            category,
        }
    }

    pub fn admin() -> Self {
        Self {
            visibility: ProductVisibility::Admin,
            category: None,
        }
    }
}

/// One entry of the home-page category grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub name: String,
    pub image_url: Option<String>,
    pub product_count: usize,
}

/// Group products by category. Each summary takes the first image of the
/// first product seen in that category. Preferred categories come first.
pub fn summarize_categories(products: &[Product]) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = Vec::new();
    for product in products {
        match summaries.iter_mut().find(|s| s.name == product.category) {
            Some(summary) => summary.product_count += 1,
            None => summaries.push(CategorySummary {
                name: product.category.clone(),
                image_url: product.first_image().map(str::to_owned),
                product_count: 1,
            }),
        }
    }
    summaries.sort_by_key(|s| category_rank(&s.name));
    summaries
}

/// Customer contact captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl CustomerContact {
    pub fn normalized(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            address: self
                .address
                .map(|a| a.trim().to_owned())
                .filter(|a| !a.is_empty()),
        }
    }

    /// Checkout form rules. Messages are shown to the customer as-is.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.first_name.trim().is_empty() {
            errors.push(FieldError::new("first_name", "Le prénom est requis."));
        } else if !is_person_name(&self.first_name) {
            errors.push(FieldError::new(
                "first_name",
                "Le prénom ne doit contenir que des lettres.",
            ));
        }
        if self.last_name.trim().is_empty() {
            errors.push(FieldError::new("last_name", "Le nom est requis."));
        } else if !is_person_name(&self.last_name) {
            errors.push(FieldError::new(
                "last_name",
                "Le nom ne doit contenir que des lettres.",
            ));
        }
        if self.phone.trim().is_empty() {
            errors.push(FieldError::new(
                "phone",
                "Le numéro de téléphone est requis.",
            ));
        } else if !is_phone_number(&self.phone) {
            errors.push(FieldError::new(
                "phone",
                "Le numéro de téléphone ne doit contenir que des chiffres.",
            ));
        }
        errors
    }
}

/// Product snapshot stored on an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: i64,
    pub image_url: Option<String>,
    pub quantity: u32,
}

impl OrderItem {
    /// Exact for any stored order, since `order_total` rejected overflow.
    pub fn line_total(&self) -> i64 {
        self.price.saturating_mul(i64::from(self.quantity))
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub customer: CustomerContact,
    pub items: Vec<OrderItem>,
    pub total: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// `None` when the total does not fit in an `i64`.
pub fn order_total(items: &[OrderItem]) -> Option<i64> {
    items.iter().try_fold(0i64, |total, item| {
        total.checked_add(item.price.checked_mul(i64::from(item.quantity))?)
    })
}

/// A customer's standing request to hear about a restock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub product_id: ProductId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Sort options for notification list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSortBy {
    CreatedAt(Sort),
}

impl Default for NotificationSortBy {
    fn default() -> Self {
        Self::CreatedAt(Sort::Desc)
    }
}

impl NotificationSortBy {
    pub fn from_kebab_case(s: &str) -> Option<Self> {
        match s {
            "created-at-desc" => Some(Self::CreatedAt(Sort::Desc)),
            "created-at-asc" => Some(Self::CreatedAt(Sort::Asc)),
            _ => None,
        }
    }
}

/// Product write that may change stock, applied under the product row lock.
#[derive(Debug, Clone)]
pub enum StockChange {
    /// Replace every editable field.
    Details(ProductDraft),
    /// Set the quantity on hand.
    Stock(i32),
}

impl StockChange {
    pub fn apply_to(&self, product: &mut Product) {
        match self {
            Self::Details(draft) => {
                product.name = draft.name.clone();
                product.price = draft.price;
                product.image_urls = draft.image_urls.clone();
                product.description = draft.description.clone();
                product.category = draft.category.clone();
                product.stock = draft.stock;
            }
            Self::Stock(stock) => product.stock = *stock,
        }
    }
}

/// Result of a committed stock write.
#[derive(Debug)]
pub struct StockWrite {
    pub product: Product,
    pub stock_before: i32,
    /// One per reservation drained by this write; empty unless it restocked.
    pub notifications: Vec<Notification>,
}

/// What happened to a reservation request, decided under the product row lock.
#[derive(Debug)]
pub enum ReserveOutcome {
    Created(Reservation),
    /// The customer had already reserved; carries the stored row.
    AlreadyReserved(Reservation),
    InStock,
    /// Unknown or soft-deleted product.
    Missing,
}

/// A restock fans out only when stock goes from none to some.
pub fn is_restock(stock_before: i32, stock_after: i32) -> bool {
    stock_before <= 0 && stock_after > 0
}

pub fn restock_message(product_name: &str) -> String {
    format!(
        "Bonne nouvelle ! Le produit \"{product_name}\" que vous attendiez est de nouveau en stock."
    )
}

/// One unread notification per waiting reservation.
pub fn restock_notifications(
    product: &Product,
    waiting: &[Reservation],
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let message = restock_message(&product.name);
    waiting
        .iter()
        .map(|reservation| Notification {
            id: NotificationId::generate(),
            user_id: reservation.user_id,
            product_id: product.id,
            message: message.clone(),
            read: false,
            created_at: now,
        })
        .collect()
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
