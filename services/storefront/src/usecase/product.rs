use tracing::info;

use wafi_domain::id::{ProductId, UserId};
use wafi_domain::pagination::PageRequest;
use wafi_domain::product::ProductStatus;

use crate::domain::handoff::WhatsAppHandoff;
use crate::domain::repository::{ProductRepository, StockRepository, UserRepository};
use crate::domain::types::{
    CategorySummary, Product, ProductDraft, ProductFilter, StockChange, StockWrite,
    summarize_categories,
};
use crate::error::StorefrontError;

// ── ListProducts ─────────────────────────────────────────────────────────────

pub struct ListProductsUseCase<P: ProductRepository> {
    pub repo: P,
}

impl<P: ProductRepository> ListProductsUseCase<P> {
    pub async fn execute(
        &self,
        filter: ProductFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Product>, StorefrontError> {
        self.repo.list(&filter, page).await
    }
}

// ── ListCategories ───────────────────────────────────────────────────────────

pub struct ListCategoriesUseCase<P: ProductRepository> {
    pub repo: P,
}

impl<P: ProductRepository> ListCategoriesUseCase<P> {
    pub async fn execute(&self) -> Result<Vec<CategorySummary>, StorefrontError> {
        let products = self.repo.list(&ProductFilter::storefront(None), None).await?;
        Ok(summarize_categories(&products))
    }
}

// ── GetProduct ───────────────────────────────────────────────────────────────

pub struct GetProductUseCase<P: ProductRepository> {
    pub repo: P,
}

impl<P: ProductRepository> GetProductUseCase<P> {
    /// Deleted products only exist for admins.
    pub async fn execute(&self, id: ProductId, is_admin: bool) -> Result<Product, StorefrontError> {
        let product = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(StorefrontError::ProductNotFound)?;
        if product.status == ProductStatus::Deleted && !is_admin {
            return Err(StorefrontError::ProductNotFound);
        }
        Ok(product)
    }
}

// ── CreateProduct ────────────────────────────────────────────────────────────

pub struct CreateProductUseCase<P: ProductRepository> {
    pub repo: P,
}

impl<P: ProductRepository> CreateProductUseCase<P> {
    pub async fn execute(&self, draft: ProductDraft) -> Result<Product, StorefrontError> {
        let draft = draft.normalized();
        StorefrontError::check(draft.validate())?;
        let product = self.repo.create(&draft).await?;
        info!(product_id = %product.id, category = %product.category, "product created");
        Ok(product)
    }
}

// ── EditProduct ──────────────────────────────────────────────────────────────

pub struct EditProductUseCase<S: StockRepository> {
    pub stock: S,
}

impl<S: StockRepository> EditProductUseCase<S> {
    pub async fn execute(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, StorefrontError> {
        let draft = draft.normalized();
        StorefrontError::check(draft.validate())?;

        let write = self
            .stock
            .write(id, &StockChange::Details(draft))
            .await?
            .ok_or(StorefrontError::ProductNotFound)?;
        log_restock(&write);
        Ok(write.product)
    }
}

// ── UpdateStock ──────────────────────────────────────────────────────────────

pub struct UpdateStockUseCase<S: StockRepository> {
    pub stock: S,
}

impl<S: StockRepository> UpdateStockUseCase<S> {
    /// Negative quantities are stored as zero.
    pub async fn execute(&self, id: ProductId, stock: i32) -> Result<Product, StorefrontError> {
        let write = self
            .stock
            .write(id, &StockChange::Stock(stock.max(0)))
            .await?
            .ok_or(StorefrontError::ProductNotFound)?;
        log_restock(&write);
        Ok(write.product)
    }
}

fn log_restock(write: &StockWrite) {
    if !write.notifications.is_empty() {
        info!(
            product_id = %write.product.id,
            stock_before = write.stock_before,
            stock = write.product.stock,
            notified = write.notifications.len(),
            "restock notifications created"
        );
    }
}

// ── SetProductStatus ─────────────────────────────────────────────────────────

/// Archive, restore or soft-delete a product.
pub struct SetProductStatusUseCase<P: ProductRepository> {
    pub repo: P,
}

impl<P: ProductRepository> SetProductStatusUseCase<P> {
    pub async fn execute(
        &self,
        id: ProductId,
        status: ProductStatus,
    ) -> Result<Product, StorefrontError> {
        let product = self
            .repo
            .set_status(id, status)
            .await?
            .ok_or(StorefrontError::ProductNotFound)?;
        info!(product_id = %id, status = %status, "product status changed");
        Ok(product)
    }
}

// ── PermanentDeleteProduct ───────────────────────────────────────────────────

pub struct PermanentDeleteProductUseCase<P: ProductRepository> {
    pub repo: P,
}

impl<P: ProductRepository> PermanentDeleteProductUseCase<P> {
    pub async fn execute(&self, id: ProductId) -> Result<(), StorefrontError> {
        if !self.repo.delete(id).await? {
            return Err(StorefrontError::ProductNotFound);
        }
        info!(product_id = %id, "product permanently deleted");
        Ok(())
    }
}

// ── RestockLink ──────────────────────────────────────────────────────────────

/// WhatsApp link asking the merchant to ping the customer once a product is back.
pub struct RestockLinkUseCase<P: ProductRepository, U: UserRepository> {
    pub products: P,
    pub users: U,
    pub handoff: WhatsAppHandoff,
}

impl<P: ProductRepository, U: UserRepository> RestockLinkUseCase<P, U> {
    pub async fn execute(
        &self,
        id: ProductId,
        requester: Option<UserId>,
    ) -> Result<String, StorefrontError> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .filter(|p| p.status != ProductStatus::Deleted)
            .ok_or(StorefrontError::ProductNotFound)?;

        let user = match requester {
            Some(user_id) => self.users.find_by_id(user_id).await?,
            None => None,
        };
        Ok(self.handoff.restock_link(&product, user.as_ref()))
    }
}

// ── SeedCatalog ──────────────────────────────────────────────────────────────

pub struct SeedCatalogUseCase<P: ProductRepository> {
    pub repo: P,
}

impl<P: ProductRepository> SeedCatalogUseCase<P> {
    /// Insert `drafts` only into an empty catalog. Returns the rows written.
    pub async fn execute(&self, drafts: Vec<ProductDraft>) -> Result<u64, StorefrontError> {
        if self.repo.count().await? > 0 {
            return Ok(0);
        }
        let drafts: Vec<ProductDraft> = drafts.into_iter().map(ProductDraft::normalized).collect();
        let inserted = self.repo.insert_many(&drafts).await?;
        info!(inserted, "catalog seeded");
        Ok(inserted)
    }
}
