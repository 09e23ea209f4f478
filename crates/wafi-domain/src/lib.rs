//! Domain types shared by the storefront service and its client.
//!
//! Pure types only, no framework dependencies. Import in `usecase/` and
//! `domain/` layers and in the client crate.

pub mod id;
pub mod order;
pub mod pagination;
pub mod product;
pub mod user;
pub mod validate;
