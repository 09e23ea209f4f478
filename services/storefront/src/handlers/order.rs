use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wafi_auth_types::identity::Identity;
use wafi_domain::id::{OrderId, ProductId, UserId};
use wafi_domain::order::OrderStatus;

use crate::domain::types::{CustomerContact, Order, OrderItem};
use crate::error::StorefrontError;
use crate::handlers::{PageQuery, require_admin};
use crate::state::AppState;
use crate::usecase::order::{
    GetOrderUseCase, ListOrdersUseCase, OrderLineInput, PlaceOrderInput, PlaceOrderUseCase,
    UpdateOrderStatusUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: ProductId,
    pub name: String,
    pub price: i64,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub line_total: i64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            line_total: item.line_total(),
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            image_url: item.image_url,
            quantity: item.quantity,
        }
    }
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub customer: CustomerContact,
    pub items: Vec<OrderItemResponse>,
    pub total: i64,
    pub status: OrderStatus,
    #[serde(serialize_with = "wafi_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            customer: order.customer,
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            total: order.total,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct PlacedOrderResponse {
    pub order: OrderResponse,
    pub whatsapp_url: String,
}

fn order_list(orders: Vec<Order>) -> Json<Vec<OrderResponse>> {
    Json(orders.into_iter().map(OrderResponse::from).collect())
}

// ── POST /api/orders ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PlaceOrderRequest {
    pub customer: CustomerContact,
    #[serde(default)]
    pub items: Vec<OrderLineInput>,
}

pub async fn place_order(
    identity: Option<Identity>,
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlacedOrderResponse>), StorefrontError> {
    let usecase = PlaceOrderUseCase {
        products: state.product_repo(),
        orders: state.order_repo(),
        handoff: state.handoff.clone(),
    };
    let out = usecase
        .execute(PlaceOrderInput {
            customer: body.customer,
            items: body.items,
            user_id: identity.map(|i| i.user_id),
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PlacedOrderResponse {
            order: out.order.into(),
            whatsapp_url: out.whatsapp_url,
        }),
    ))
}

// ── GET /api/orders ──────────────────────────────────────────────────────────

pub async fn list_orders(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<OrderResponse>>, StorefrontError> {
    require_admin(&identity)?;
    let usecase = ListOrdersUseCase {
        repo: state.order_repo(),
    };
    let orders = usecase.execute(None, query.page_request()).await?;
    Ok(order_list(orders))
}

// ── GET /api/orders/mine ─────────────────────────────────────────────────────

pub async fn my_orders(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<OrderResponse>>, StorefrontError> {
    let usecase = ListOrdersUseCase {
        repo: state.order_repo(),
    };
    let orders = usecase
        .execute(Some(identity.user_id), query.page_request())
        .await?;
    Ok(order_list(orders))
}

// ── GET /api/orders/{id} ─────────────────────────────────────────────────────

pub async fn get_order(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderResponse>, StorefrontError> {
    let usecase = GetOrderUseCase {
        repo: state.order_repo(),
    };
    let order = usecase.execute(id, &identity).await?;
    Ok(Json(order.into()))
}

// ── PUT /api/orders/{id}/status ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct OrderStatusRequest {
    pub status: OrderStatus,
}

pub async fn update_order_status(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<OrderStatusRequest>,
) -> Result<Json<OrderResponse>, StorefrontError> {
    require_admin(&identity)?;
    let usecase = UpdateOrderStatusUseCase {
        repo: state.order_repo(),
    };
    let order = usecase.execute(id, body.status).await?;
    Ok(Json(order.into()))
}
