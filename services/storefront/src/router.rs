use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use wafi_core::error::not_found;
use wafi_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    notification::{list_notifications, mark_notifications_read, unread_count},
    order::{get_order, list_orders, my_orders, place_order, update_order_status},
    product::{
        create_product, delete_product, edit_product, get_product, list_admin_products,
        list_categories, list_products, permanently_delete_product, restock_link,
        set_product_status, update_stock,
    },
    healthz, readyz,
    reservation::{
        clear_product_reservations, create_reservation, list_reservations,
        list_user_reservations,
    },
    user::{get_me, get_user, list_users, login, register},
};
use crate::state::AppState;

fn api_routes() -> Router<AppState> {
    Router::new()
        // Users
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/@me", get(get_me))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        // Products
        .route("/products", get(list_products).post(create_product))
        .route("/products/admin", get(list_admin_products))
        .route("/products/categories", get(list_categories))
        .route(
            "/products/{id}",
            get(get_product).put(edit_product).delete(delete_product),
        )
        .route("/products/{id}/stock", put(update_stock))
        .route("/products/{id}/status", put(set_product_status))
        .route("/products/{id}/permanent", delete(permanently_delete_product))
        .route("/products/{id}/restock-link", get(restock_link))
        // Orders
        .route("/orders", get(list_orders).post(place_order))
        .route("/orders/mine", get(my_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", put(update_order_status))
        // Reservations
        .route("/reservations", get(list_reservations).post(create_reservation))
        .route("/reservations/user/{user_id}", get(list_user_reservations))
        .route(
            "/reservations/product/{product_id}",
            delete(clear_product_reservations),
        )
        // Notifications
        .route("/notifications", get(list_notifications))
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/read", post(mark_notifications_read))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api", api_routes())
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
