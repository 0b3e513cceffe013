//! Business logic services for the Fuel Station Dashboard

pub mod auth;
pub mod dashboard;
pub mod reading;
pub mod reporting;
pub mod tank;
pub mod token;

pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use reading::ReadingService;
pub use reporting::ReportingService;
pub use tank::TankService;
pub use token::TokenService;
