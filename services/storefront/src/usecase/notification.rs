use wafi_domain::id::UserId;
use wafi_domain::pagination::PageRequest;

use crate::domain::repository::NotificationRepository;
use crate::domain::types::{Notification, NotificationSortBy};
use crate::error::StorefrontError;

// ── ListNotifications ────────────────────────────────────────────────────────

pub struct ListNotificationsUseCase<N: NotificationRepository> {
    pub repo: N,
}

impl<N: NotificationRepository> ListNotificationsUseCase<N> {
    pub async fn execute(
        &self,
        user_id: UserId,
        sort_by: NotificationSortBy,
        page: PageRequest,
    ) -> Result<Vec<Notification>, StorefrontError> {
        self.repo.list(user_id, sort_by, page).await
    }
}

// ── CountUnread ──────────────────────────────────────────────────────────────

pub struct CountUnreadUseCase<N: NotificationRepository> {
    pub repo: N,
}

impl<N: NotificationRepository> CountUnreadUseCase<N> {
    pub async fn execute(&self, user_id: UserId) -> Result<u64, StorefrontError> {
        self.repo.count_unread(user_id).await
    }
}

// ── MarkAllRead ──────────────────────────────────────────────────────────────

pub struct MarkAllReadUseCase<N: NotificationRepository> {
    pub repo: N,
}

impl<N: NotificationRepository> MarkAllReadUseCase<N> {
    pub async fn execute(&self, user_id: UserId) -> Result<u64, StorefrontError> {
        self.repo.mark_all_read(user_id).await
    }
}
