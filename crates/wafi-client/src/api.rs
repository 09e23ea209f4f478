//! Typed client for the storefront `/api` surface.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use wafi_domain::id::ProductId;
use wafi_domain::pagination::PageRequest;

use crate::error::ClientError;
use crate::forms::RegisterForm;
use crate::model::{
    AuthSession, Category, ErrorBody, Notification, Order, OrderRequest, PlacedOrder, Product,
    Reservation, User,
};

#[derive(serde::Deserialize)]
struct UnreadCount {
    unread: u64,
}

#[derive(serde::Deserialize)]
struct Updated {
    updated: u64,
}

#[derive(serde::Deserialize)]
struct WhatsAppLink {
    whatsapp_url: String,
}

/// One shopper's connection to the service. Login stores the bearer token
/// used by every later call; logout drops it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api{path}", self.base_url);
        debug!(%method, %url, "storefront request");
        let req = self.client.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = check(req.send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    // ── Account ──────────────────────────────────────────────────────────────

    /// Validates locally, then creates the account and signs in.
    pub async fn register(&mut self, form: &RegisterForm) -> Result<AuthSession, ClientError> {
        form.check()?;
        let body = json!({
            "email": form.email.trim(),
            "password": form.password,
            "first_name": form.first_name.trim(),
            "last_name": form.last_name.trim(),
        });
        let session: AuthSession = self.post("/users/register", &body).await?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        let body = json!({ "email": email, "password": password });
        let session: AuthSession = self.post("/users/login", &body).await?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        self.get("/users/@me").await
    }

    // ── Catalog ──────────────────────────────────────────────────────────────

    pub async fn products(
        &self,
        category: Option<&str>,
        page: Option<PageRequest>,
    ) -> Result<Vec<Product>, ClientError> {
        let mut query: Vec<String> = Vec::new();
        if let Some(category) = category {
            query.push(format!("category={}", urlencoding::encode(category)));
        }
        if let Some(page) = page {
            query.push(format!("page={}", page.page));
            query.push(format!("per-page={}", page.per_page));
        }
        let path = if query.is_empty() {
            "/products".to_owned()
        } else {
            format!("/products?{}", query.join("&"))
        };
        self.get(&path).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        self.get("/products/categories").await
    }

    pub async fn product(&self, id: ProductId) -> Result<Product, ClientError> {
        self.get(&format!("/products/{id}")).await
    }

    pub async fn restock_link(&self, id: ProductId) -> Result<String, ClientError> {
        let link: WhatsAppLink = self.get(&format!("/products/{id}/restock-link")).await?;
        Ok(link.whatsapp_url)
    }

    // ── Orders ───────────────────────────────────────────────────────────────

    pub async fn create_order(&self, order: &OrderRequest) -> Result<PlacedOrder, ClientError> {
        self.post("/orders", order).await
    }

    pub async fn my_orders(&self) -> Result<Vec<Order>, ClientError> {
        self.require_token()?;
        self.get("/orders/mine").await
    }

    // ── Reservations & notifications ─────────────────────────────────────────

    pub async fn reserve(&self, product_id: ProductId) -> Result<Reservation, ClientError> {
        self.require_token()?;
        self.post("/reservations", &json!({ "product_id": product_id }))
            .await
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>, ClientError> {
        self.require_token()?;
        self.get("/notifications").await
    }

    pub async fn unread_count(&self) -> Result<u64, ClientError> {
        self.require_token()?;
        let body: UnreadCount = self.get("/notifications/unread-count").await?;
        Ok(body.unread)
    }

    pub async fn mark_notifications_read(&self) -> Result<u64, ClientError> {
        self.require_token()?;
        let body: Updated = self.post("/notifications/read", &json!({})).await?;
        Ok(body.updated)
    }

    fn require_token(&self) -> Result<(), ClientError> {
        match self.token {
            Some(_) => Ok(()),
            None => Err(ClientError::NotSignedIn),
        }
    }
}

/// Turn non-2xx responses into `ClientError::Api`.
async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let err = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => ClientError::Api {
            status: status.as_u16(),
            kind: body.kind,
            message: body.message,
            errors: body.errors,
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            kind: "UNKNOWN".to_owned(),
            message: text,
            errors: Vec::new(),
        },
    };
    Err(err)
}
