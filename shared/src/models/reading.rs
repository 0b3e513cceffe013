//! Daily dip and totalizer reading models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::reconciliation::MeterReadings;
use crate::types::ParseEnumError;

/// One row per (tank, date)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DipReading {
    pub id: i64,
    pub tank_id: i64,
    pub reading_date: NaiveDate,
    pub opening_dip: Option<Decimal>,
    pub closing_dip: Option<Decimal>,
    pub opening_totalizer: Option<Decimal>,
    pub closing_totalizer: Option<Decimal>,
    pub purchase_qty: Decimal,
    pub status: ReadingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DipReading {
    pub fn meter_readings(&self) -> MeterReadings {
        MeterReadings {
            opening_dip: self.opening_dip,
            closing_dip: self.closing_dip,
            purchase_qty: Some(self.purchase_qty),
            opening_totalizer: self.opening_totalizer,
            closing_totalizer: self.closing_totalizer,
        }
    }
}

/// Lifecycle status of a reading row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    #[default]
    Submitted,
}

impl ReadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Submitted => "submitted",
        }
    }
}

impl FromStr for ReadingStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(ReadingStatus::Submitted),
            other => Err(ParseEnumError::new("reading status", other)),
        }
    }
}
