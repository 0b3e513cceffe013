//! Domain models for the Fuel Station Dashboard

mod fuel;
mod reading;
mod tank;
mod token;
mod user;

pub use fuel::*;
pub use reading::*;
pub use tank::*;
pub use token::*;
pub use user::*;
