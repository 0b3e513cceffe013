//! Shared types and models for the Fuel Station Dashboard
//!
//! This crate contains the domain models and the pure station arithmetic
//! (reconciliation, daily report aggregation, token search) shared between
//! the backend and the browser (via WASM).

pub mod format;
pub mod models;
pub mod reading;
pub mod reconciliation;
pub mod report;
pub mod token_filter;
pub mod types;
pub mod validation;

pub use format::*;
pub use models::*;
pub use reading::*;
pub use reconciliation::*;
pub use report::*;
pub use token_filter::*;
pub use types::*;
pub use validation::*;
