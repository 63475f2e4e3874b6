//! Shared types and core logic for the Warehouse Operations Console
//!
//! This crate contains everything that is independent of transport and
//! rendering: wire models for the external inventory API, the document
//! draft editor, the reporting reducers, and validation helpers. It is
//! consumed by the console crate and by the WASM bindings.

pub mod analytics;
pub mod draft;
pub mod models;
pub mod types;
pub mod validation;

pub use analytics::*;
pub use draft::*;
pub use models::*;
pub use types::*;
pub use validation::*;
