//! Storage tank models

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::FuelType;

/// Fill level below which a tank is flagged as low stock
pub const DEFAULT_LOW_STOCK_PERCENT: i64 = 30;

/// An underground storage tank
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tank {
    pub id: i64,
    pub tank_number: String,
    pub fuel_type_id: i64,
    pub capacity: Decimal,
    /// Overwritten with the closing dip each time a reading is saved
    pub current_stock: Decimal,
    pub is_active: bool,
    pub fuel_type: Option<FuelType>,
}

impl Tank {
    /// Live unit price of the tank's fuel, zero when the fuel type is unknown
    pub fn unit_price(&self) -> Decimal {
        self.fuel_type
            .as_ref()
            .map(|f| f.price)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn level(&self, low_stock_percent: i64) -> TankLevel {
        let fill_percent = fill_percent(self.current_stock, self.capacity);
        TankLevel {
            tank_id: self.id,
            tank_number: self.tank_number.clone(),
            fuel_code: self.fuel_type.as_ref().map(|f| f.code.clone()),
            fuel_name: self.fuel_type.as_ref().map(|f| f.name.clone()),
            capacity: self.capacity,
            current_stock: self.current_stock,
            fill_percent,
            is_low: fill_percent < low_stock_percent,
        }
    }
}

/// Stock gauge for one tank
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TankLevel {
    pub tank_id: i64,
    pub tank_number: String,
    pub fuel_code: Option<String>,
    pub fuel_name: Option<String>,
    pub capacity: Decimal,
    pub current_stock: Decimal,
    pub fill_percent: i64,
    pub is_low: bool,
}

/// Stock as a whole percentage of capacity, rounded half away from zero
pub fn fill_percent(current_stock: Decimal, capacity: Decimal) -> i64 {
    if capacity <= Decimal::ZERO {
        return 0;
    }
    (current_stock / capacity * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}
