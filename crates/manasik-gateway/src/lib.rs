//! # Manasik Gateway
//! HTTP API in front of the answer synthesizer.
//!
//! - `GET  /api/health` — liveness and provider status
//! - `POST /api/chat`   — `{"message": "..."}` → `{"answer": "..."}`

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start_server};
