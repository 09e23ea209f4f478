use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wafi_auth_types::identity::Identity;
use wafi_domain::id::{NotificationId, ProductId};
use wafi_domain::pagination::PageRequest;

use crate::domain::types::{Notification, NotificationSortBy};
use crate::error::StorefrontError;
use crate::state::AppState;
use crate::usecase::notification::{
    CountUnreadUseCase, ListNotificationsUseCase, MarkAllReadUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: NotificationId,
    pub product_id: ProductId,
    pub message: String,
    pub read: bool,
    #[serde(serialize_with = "wafi_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            product_id: notification.product_id,
            message: notification.message,
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct NotificationListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "wafi_core::serde::blank_as_none")]
    pub sort_by: Option<String>,
}

// ── GET /api/notifications ───────────────────────────────────────────────────

pub async fn list_notifications(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<Vec<NotificationResponse>>, StorefrontError> {
    // Unknown sort keys fall back to newest first.
    let sort_by = query
        .sort_by
        .as_deref()
        .and_then(NotificationSortBy::from_kebab_case)
        .unwrap_or_default();
    let defaults = PageRequest::default();
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(defaults.per_page),
        page: query.page.unwrap_or(defaults.page),
    };

    let usecase = ListNotificationsUseCase {
        repo: state.notification_repo(),
    };
    let notifications = usecase.execute(identity.user_id, sort_by, page).await?;
    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

// ── GET /api/notifications/unread-count ──────────────────────────────────────

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub unread: u64,
}

pub async fn unread_count(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UnreadCountResponse>, StorefrontError> {
    let usecase = CountUnreadUseCase {
        repo: state.notification_repo(),
    };
    let unread = usecase.execute(identity.user_id).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

// ── POST /api/notifications/read ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct UpdatedResponse {
    pub updated: u64,
}

pub async fn mark_notifications_read(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UpdatedResponse>, StorefrontError> {
    let usecase = MarkAllReadUseCase {
        repo: state.notification_repo(),
    };
    let updated = usecase.execute(identity.user_id).await?;
    Ok(Json(UpdatedResponse { updated }))
}
