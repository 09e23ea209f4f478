//! Mock auth helpers for router and integration tests.
//!
//! `MockAuth` signs a real token with a shared test secret, so requests go
//! through the same `Identity` extractor as production traffic.

use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};

use wafi_auth_types::token::issue_token;
use wafi_domain::id::UserId;
use wafi_domain::user::UserRole;

/// Secret the test router state must be built with.
pub const TEST_JWT_SECRET: &str = "wafi-test-jwt-secret";

/// Identity to sign into test requests.
#[derive(Debug, Clone, Copy)]
pub struct MockAuth {
    pub user_id: UserId,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn customer() -> Self {
        Self::new(UserId::generate(), UserRole::Customer)
    }

    pub fn admin() -> Self {
        Self::new(UserId::generate(), UserRole::Admin)
    }

    /// Signed bearer token valid for ten minutes.
    pub fn token(&self) -> String {
        let (token, _) = issue_token(self.user_id, self.role, TEST_JWT_SECRET, 600)
            .unwrap_or_else(|e| panic!("failed to sign test token: {e}"));
        token
    }

    /// `Authorization: Bearer ...` header value.
    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token()))
            .unwrap_or_else(|e| panic!("invalid header value: {e}"))
    }

    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, self.header_value());
        map
    }
}
