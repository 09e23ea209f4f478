use anyhow::Context as _;

use crate::domain::types::ProductDraft;

const CATALOG_JSON: &str = include_str!("../../seed/catalog.json");

/// Products inserted into an empty catalog on first start.
pub fn default_catalog() -> anyhow::Result<Vec<ProductDraft>> {
    serde_json::from_str(CATALOG_JSON).context("parse bundled catalog")
}
