//! HTTP server for MoodyBot.
//!
//! # Endpoints
//!
//! - `GET  /health` — Liveness probe
//! - `/api/*` — users, chat, journal, quotes, mood, damage profile,
//!   reflection stacks, validation and the persona engine
//!
//! See [`routes`] for the full list.

pub mod routes;

pub use routes::{app_router, AppState};
