//! Client library for the Wafi storefront.
//!
//! Holds what a single shopper's session needs: the back/forward view
//! history, login-driven session transitions, the cart, form validation and
//! a typed HTTP client for the `/api` surface.

pub mod api;
pub mod cart;
pub mod error;
pub mod forms;
pub mod model;
pub mod navigation;
pub mod session;
