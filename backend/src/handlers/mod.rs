//! HTTP request handlers

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod readings;
pub mod reporting;
pub mod tanks;
pub mod tokens;

pub use auth::*;
pub use dashboard::*;
pub use health::*;
pub use readings::*;
pub use reporting::*;
pub use tanks::*;
pub use tokens::*;
