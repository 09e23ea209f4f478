//! Plumbing shared by Wafi HTTP services: error bodies, health answers,
//! request tracing, environment config and serde helpers.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
