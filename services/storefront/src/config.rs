use serde::Deserialize;

use wafi_core::config::Config;

/// Storefront service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct StorefrontConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing bearer tokens.
    pub jwt_secret: String,
    /// Merchant WhatsApp number, country code included, digits only.
    #[serde(default = "default_merchant_whatsapp_number")]
    pub merchant_whatsapp_number: String,
    /// TCP port to listen on. Env var: `STOREFRONT_PORT`.
    #[serde(default = "default_storefront_port")]
    pub storefront_port: u16,
    /// Origin used for product links in WhatsApp messages.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    #[serde(default = "default_shop_name")]
    pub shop_name: String,
    /// Bearer token lifetime in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
    /// Insert the bundled catalog when the products table is empty.
    #[serde(default = "default_seed_catalog")]
    pub seed_catalog: bool,
}

impl Config for StorefrontConfig {}

fn default_merchant_whatsapp_number() -> String {
    "221123456789".to_owned()
}

fn default_storefront_port() -> u16 {
    5002
}

fn default_public_base_url() -> String {
    "http://localhost:5002".to_owned()
}

fn default_shop_name() -> String {
    "Belleza".to_owned()
}

fn default_token_ttl_secs() -> i64 {
    3600
}

fn default_seed_catalog() -> bool {
    true
}
