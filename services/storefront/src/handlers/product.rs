use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wafi_auth_types::identity::Identity;
use wafi_domain::id::ProductId;
use wafi_domain::product::ProductStatus;

use crate::domain::types::{CategorySummary, Product, ProductDraft, ProductFilter};
use crate::error::StorefrontError;
use crate::handlers::{PageQuery, require_admin};
use crate::state::AppState;
use crate::usecase::product::{
    CreateProductUseCase, EditProductUseCase, GetProductUseCase, ListCategoriesUseCase,
    ListProductsUseCase, PermanentDeleteProductUseCase, RestockLinkUseCase,
    SetProductStatusUseCase, UpdateStockUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub price: i64,
    pub image_urls: Vec<String>,
    pub description: String,
    pub category: String,
    pub stock: i32,
    pub in_stock: bool,
    pub status: ProductStatus,
    #[serde(serialize_with = "wafi_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "wafi_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            in_stock: product.in_stock(),
            id: product.id,
            name: product.name,
            price: product.price,
            image_urls: product.image_urls,
            description: product.description,
            category: product.category,
            stock: product.stock,
            status: product.status,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub name: String,
    pub image_url: Option<String>,
    pub product_count: usize,
}

impl From<CategorySummary> for CategoryResponse {
    fn from(summary: CategorySummary) -> Self {
        Self {
            name: summary.name,
            image_url: summary.image_url,
            product_count: summary.product_count,
        }
    }
}

#[derive(Serialize)]
pub struct WhatsAppLinkResponse {
    pub whatsapp_url: String,
}

fn product_list(products: Vec<Product>) -> Json<Vec<ProductResponse>> {
    Json(products.into_iter().map(ProductResponse::from).collect())
}

// ── GET /api/products ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ProductListQuery {
    #[serde(default, deserialize_with = "wafi_core::serde::blank_as_none")]
    pub category: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductResponse>>, StorefrontError> {
    let page = PageQuery {
        per_page: query.per_page,
        page: query.page,
    }
    .requested();

    let usecase = ListProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase
        .execute(ProductFilter::storefront(query.category), page)
        .await?;
    Ok(product_list(products))
}

// ── GET /api/products/admin ──────────────────────────────────────────────────

pub async fn list_admin_products(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ProductResponse>>, StorefrontError> {
    require_admin(&identity)?;
    let usecase = ListProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase
        .execute(ProductFilter::admin(), query.requested())
        .await?;
    Ok(product_list(products))
}

// ── GET /api/products/categories ─────────────────────────────────────────────

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, StorefrontError> {
    let usecase = ListCategoriesUseCase {
        repo: state.product_repo(),
    };
    let categories = usecase.execute().await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

// ── GET /api/products/{id} ───────────────────────────────────────────────────

pub async fn get_product(
    identity: Option<Identity>,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductResponse>, StorefrontError> {
    let is_admin = identity.is_some_and(|i| i.is_admin());
    let usecase = GetProductUseCase {
        repo: state.product_repo(),
    };
    let product = usecase.execute(id, is_admin).await?;
    Ok(Json(product.into()))
}

// ── POST /api/products ───────────────────────────────────────────────────────

pub async fn create_product(
    identity: Identity,
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<ProductResponse>), StorefrontError> {
    require_admin(&identity)?;
    let usecase = CreateProductUseCase {
        repo: state.product_repo(),
    };
    let product = usecase.execute(draft).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

// ── PUT /api/products/{id} ───────────────────────────────────────────────────

pub async fn edit_product(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<ProductResponse>, StorefrontError> {
    require_admin(&identity)?;
    let usecase = EditProductUseCase {
        stock: state.stock_repo(),
    };
    let product = usecase.execute(id, draft).await?;
    Ok(Json(product.into()))
}

// ── PUT /api/products/{id}/stock ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct StockRequest {
    pub stock: i32,
}

pub async fn update_stock(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<StockRequest>,
) -> Result<Json<ProductResponse>, StorefrontError> {
    require_admin(&identity)?;
    let usecase = UpdateStockUseCase {
        stock: state.stock_repo(),
    };
    let product = usecase.execute(id, body.stock).await?;
    Ok(Json(product.into()))
}

// ── PUT /api/products/{id}/status ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: ProductStatus,
}

pub async fn set_product_status(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<ProductResponse>, StorefrontError> {
    require_admin(&identity)?;
    let usecase = SetProductStatusUseCase {
        repo: state.product_repo(),
    };
    let product = usecase.execute(id, body.status).await?;
    Ok(Json(product.into()))
}

// ── DELETE /api/products/{id} ────────────────────────────────────────────────

pub async fn delete_product(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductResponse>, StorefrontError> {
    require_admin(&identity)?;
    let usecase = SetProductStatusUseCase {
        repo: state.product_repo(),
    };
    let product = usecase.execute(id, ProductStatus::Deleted).await?;
    Ok(Json(product.into()))
}

// ── DELETE /api/products/{id}/permanent ──────────────────────────────────────

pub async fn permanently_delete_product(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, StorefrontError> {
    require_admin(&identity)?;
    let usecase = PermanentDeleteProductUseCase {
        repo: state.product_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /api/products/{id}/restock-link ──────────────────────────────────────

pub async fn restock_link(
    identity: Option<Identity>,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<WhatsAppLinkResponse>, StorefrontError> {
    let usecase = RestockLinkUseCase {
        products: state.product_repo(),
        users: state.user_repo(),
        handoff: state.handoff.clone(),
    };
    let whatsapp_url = usecase.execute(id, identity.map(|i| i.user_id)).await?;
    Ok(Json(WhatsAppLinkResponse { whatsapp_url }))
}
