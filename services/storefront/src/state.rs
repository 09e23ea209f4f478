use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use wafi_auth_types::identity::JwtSecret;

use crate::domain::handoff::WhatsAppHandoff;
use crate::infra::db::{
    DbNotificationRepository, DbOrderRepository, DbProductRepository, DbReservationRepository,
    DbStockRepository, DbUserRepository,
};
use crate::infra::password::Argon2Hasher;
use crate::usecase::user::TokenSettings;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: JwtSecret,
    pub token_ttl_secs: i64,
    pub handoff: WhatsAppHandoff,
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn product_repo(&self) -> DbProductRepository {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn reservation_repo(&self) -> DbReservationRepository {
        DbReservationRepository {
            db: self.db.clone(),
        }
    }

    pub fn notification_repo(&self) -> DbNotificationRepository {
        DbNotificationRepository {
            db: self.db.clone(),
        }
    }

    pub fn password_hasher(&self) -> Argon2Hasher {
        Argon2Hasher
    }

    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings {
            secret: self.jwt_secret.clone(),
            ttl_secs: self.token_ttl_secs,
        }
    }

    pub fn stock_repo(&self) -> DbStockRepository {
        DbStockRepository {
            db: self.db.clone(),
        }
    }
}
