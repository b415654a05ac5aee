//! # Manasik Core
//!
//! Shared building blocks for the Manasik workspace:
//! - **types** — corpus `Document`, ranked `ScoredResult`, typed `ProviderResponse`
//! - **traits** — the `Provider` seam to the generative model service
//! - **config** — TOML configuration with per-field defaults
//! - **error** — `ManasikError` and the crate-wide `Result` alias

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::ManasikConfig;
pub use error::{ManasikError, Result};
pub use traits::Provider;
pub use types::{Document, ScoredResult};
