//! Fuel type reference data

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A fuel grade sold at the station (e.g. "PET" petrol, "DSL" diesel)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelType {
    pub id: i64,
    pub code: String,
    pub name: String,
    /// Current unit price per litre, read live for revenue
    pub price: Decimal,
}

/// Code and display name embedded in token listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FuelTypeSummary {
    pub code: String,
    pub name: String,
}
