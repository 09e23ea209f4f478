//! Shopping cart held in memory for the current session.

use wafi_domain::id::ProductId;

use crate::error::ClientError;
use crate::model::{OrderLine, Product};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// `None` when the amount does not fit in an `i64`.
    pub fn line_total(&self) -> Option<i64> {
        self.product.price.checked_mul(i64::from(self.quantity))
    }
}

/// Lines in insertion order, at most one per product.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Add one unit. Archived, deleted or out-of-stock products are refused.
    pub fn add(&mut self, product: &Product) -> Result<(), ClientError> {
        if !product.purchasable() {
            return Err(ClientError::ProductUnavailable(product.id));
        }
        match self.lines.iter_mut().find(|l| l.product.id == product.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            }),
        }
        Ok(())
    }

    /// Set a line's quantity. Zero removes the line.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product_id) {
            line.quantity = quantity;
        }
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|l| l.product.id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// `None` when the total does not fit in an `i64`.
    pub fn total(&self) -> Option<i64> {
        self.lines
            .iter()
            .try_fold(0i64, |total, line| total.checked_add(line.line_total()?))
    }

    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|l| OrderLine {
                product_id: l.product.id,
                quantity: l.quantity,
            })
            .collect()
    }
}
