//! Bearer-token auth shared by the storefront service and its tests.
//!
//! Provides JWT issue/validation and the `Identity` extractor.

pub mod identity;
pub mod token;
