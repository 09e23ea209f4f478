//! Product lifecycle and catalog visibility.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a catalog product.
///
/// `Deleted` is the soft-delete terminal state; rows are only physically
/// removed through the permanent-delete path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Archived,
    Deleted,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown product status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ProductStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            "deleted" => Ok(Self::Deleted),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Which audience a product listing is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductVisibility {
    /// Customer-facing catalog: active products only.
    Storefront,
    /// Inventory management: every status, including soft-deleted.
    Admin,
}

impl ProductVisibility {
    pub fn admits(self, status: ProductStatus) -> bool {
        match self {
            Self::Storefront => status == ProductStatus::Active,
            Self::Admin => true,
        }
    }

    /// Statuses a listing query should filter on. `None` means unfiltered.
    pub fn statuses(self) -> Option<&'static [ProductStatus]> {
        match self {
            Self::Storefront => Some(&[ProductStatus::Active]),
            Self::Admin => None,
        }
    }
}

/// Category labels shown first on the home page, in this order. Any other
/// category follows alphabetically.
pub const PREFERRED_CATEGORY_ORDER: [&str; 3] = [
    "Produits de Beauté",
    "Électronique",
    "Produits Cosmétiques & Accessoires",
];

/// Sort key placing preferred categories first.
pub fn category_rank(category: &str) -> (usize, String) {
    let rank = PREFERRED_CATEGORY_ORDER
        .iter()
        .position(|c| *c == category)
        .unwrap_or(PREFERRED_CATEGORY_ORDER.len());
    (rank, category.to_owned())
}
