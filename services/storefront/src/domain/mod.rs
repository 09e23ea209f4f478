pub mod handoff;
pub mod repository;
pub mod types;
