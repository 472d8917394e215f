//! Shared utilities: configuration, errors, resilience and text cleanup.

pub mod circuit_breaker;
pub mod config;
pub mod errors;
pub mod json_repair;
pub mod post_process;
