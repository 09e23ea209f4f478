use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use wafi_auth_types::identity::Identity;
use wafi_domain::id::{OrderId, ProductId, UserId};
use wafi_domain::order::OrderStatus;
use wafi_domain::pagination::PageRequest;

use crate::domain::handoff::WhatsAppHandoff;
use crate::domain::repository::{OrderRepository, ProductRepository};
use crate::domain::types::{CustomerContact, FieldError, Order, OrderItem, order_total};
use crate::error::StorefrontError;

/// A requested order line: which product and how many.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrderLineInput {
    pub product_id: ProductId,
    pub quantity: u32,
}

// ── PlaceOrder ───────────────────────────────────────────────────────────────

pub struct PlaceOrderInput {
    pub customer: CustomerContact,
    pub items: Vec<OrderLineInput>,
    /// Signed-in customer, if any. Guests may order too.
    pub user_id: Option<UserId>,
}

#[derive(Debug)]
pub struct PlaceOrderOutput {
    pub order: Order,
    pub whatsapp_url: String,
}

pub struct PlaceOrderUseCase<P: ProductRepository, O: OrderRepository> {
    pub products: P,
    pub orders: O,
    pub handoff: WhatsAppHandoff,
}

impl<P: ProductRepository, O: OrderRepository> PlaceOrderUseCase<P, O> {
    pub async fn execute(&self, input: PlaceOrderInput) -> Result<PlaceOrderOutput, StorefrontError> {
        let customer = input.customer.normalized();
        let mut errors = customer.validate();
        if input.items.iter().any(|line| line.quantity == 0) {
            errors.push(FieldError::new("items", "quantity must be at least 1"));
        }
        StorefrontError::check(errors)?;

        let lines = merge_lines(&input.items);
        if lines.is_empty() {
            return Err(StorefrontError::EmptyOrder);
        }

        let ids: Vec<ProductId> = lines.iter().map(|line| line.product_id).collect();
        let products = self.products.find_many(&ids).await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let product = products
                .iter()
                .find(|p| p.id == line.product_id)
                .filter(|p| p.purchasable())
                .ok_or(StorefrontError::ProductUnavailable(line.product_id))?;
            items.push(OrderItem {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                image_url: product.first_image().map(str::to_owned),
                quantity: line.quantity,
            });
        }

        let total = order_total(&items).ok_or_else(|| {
            StorefrontError::Validation(vec![FieldError::new(
                "items",
                "order total is too large",
            )])
        })?;
        let order = Order {
            id: OrderId::generate(),
            user_id: input.user_id,
            customer,
            total,
            items,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        self.orders.create(&order).await?;
        info!(
            order_id = %order.id,
            lines = order.items.len(),
            total = order.total,
            "order placed"
        );

        let whatsapp_url = self.handoff.order_link(&order);
        Ok(PlaceOrderOutput {
            order,
            whatsapp_url,
        })
    }
}

/// Collapse repeated products into one line, keeping first-seen order.
fn merge_lines(lines: &[OrderLineInput]) -> Vec<OrderLineInput> {
    let mut merged: Vec<OrderLineInput> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|m| m.product_id == line.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(*line),
        }
    }
    merged
}

// ── ListOrders ───────────────────────────────────────────────────────────────

pub struct ListOrdersUseCase<O: OrderRepository> {
    pub repo: O,
}

impl<O: OrderRepository> ListOrdersUseCase<O> {
    /// All orders when `user_id` is `None`, otherwise that customer's.
    pub async fn execute(
        &self,
        user_id: Option<UserId>,
        page: PageRequest,
    ) -> Result<Vec<Order>, StorefrontError> {
        self.repo.list(user_id, page).await
    }
}

// ── GetOrder ─────────────────────────────────────────────────────────────────

pub struct GetOrderUseCase<O: OrderRepository> {
    pub repo: O,
}

impl<O: OrderRepository> GetOrderUseCase<O> {
    /// Owners see their own orders; guest orders are visible to admins only.
    pub async fn execute(&self, id: OrderId, identity: &Identity) -> Result<Order, StorefrontError> {
        let order = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(StorefrontError::OrderNotFound)?;
        let allowed = match order.user_id {
            Some(owner) => identity.can_access(owner),
            None => identity.is_admin(),
        };
        if !allowed {
            return Err(StorefrontError::Forbidden);
        }
        Ok(order)
    }
}

// ── UpdateOrderStatus ────────────────────────────────────────────────────────

pub struct UpdateOrderStatusUseCase<O: OrderRepository> {
    pub repo: O,
}

impl<O: OrderRepository> UpdateOrderStatusUseCase<O> {
    pub async fn execute(&self, id: OrderId, status: OrderStatus) -> Result<Order, StorefrontError> {
        let order = self
            .repo
            .set_status(id, status)
            .await?
            .ok_or(StorefrontError::OrderNotFound)?;
        info!(order_id = %id, status = %status, "order status changed");
        Ok(order)
    }
}
