//! sea-orm entities for the storefront database.

pub mod notifications;
pub mod orders;
pub mod products;
pub mod reservations;
pub mod users;
