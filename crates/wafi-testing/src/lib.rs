//! Test utilities for Wafi services.
//!
//! Provides `MockAuth` for signed bearer headers and helpers for reading
//! JSON response bodies. Import from dev-dependencies only.

pub mod auth;
pub mod body;
