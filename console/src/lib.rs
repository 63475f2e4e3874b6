//! Warehouse Operations Console
//!
//! A thin client over an external inventory API: document draft
//! editing with availability-aware line rules, and in-memory analytics
//! recomputation with supersession-safe fetch cycles. Pure draft and
//! aggregation logic lives in the `shared` crate; this crate adds the
//! API boundary, authentication, and the stateful services views hold.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod services;

pub use api::ApiClient;
pub use auth::{Claims, TokenClient};
pub use config::Config;
pub use error::{AppError, AppResult};
