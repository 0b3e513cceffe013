//! Daily sales report aggregation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DipReading, FuelToken, Tank, TokenStats};
use crate::reconciliation::{reconcile_for_report, ReconcileError, Reconciliation};
use crate::types::DayWindow;

/// One tank's line in the daily report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TankDaySummary {
    pub tank_id: i64,
    pub tank_number: String,
    pub fuel_code: Option<String>,
    pub fuel_name: Option<String>,
    pub unit_price: Decimal,
    /// False when no reading was saved for the date; the row is then all zeros
    pub has_reading: bool,
    pub opening_dip: Option<Decimal>,
    pub closing_dip: Option<Decimal>,
    pub purchase_qty: Decimal,
    pub dip_sales: Decimal,
    pub totalizer_sales: Option<Decimal>,
    pub difference: Option<Decimal>,
    pub revenue: Decimal,
}

/// Station summary for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub tanks: Vec<TankDaySummary>,
    pub token_stats: TokenStats,
    pub total_revenue: Decimal,
    pub total_dip_sales: Decimal,
    pub total_totalizer_sales: Decimal,
}

/// Build the report for `date` from already-fetched rows.
///
/// Readings for other dates and tokens created outside the day's UTC window
/// are ignored, so callers may pass wider result sets.
pub fn aggregate_daily_report(
    date: NaiveDate,
    tanks: &[Tank],
    readings: &[DipReading],
    tokens: &[FuelToken],
) -> Result<DailyReport, ReconcileError> {
    let rows = tanks
        .iter()
        .map(|tank| {
            let reading = readings
                .iter()
                .find(|r| r.tank_id == tank.id && r.reading_date == date);
            summarize_tank(tank, reading)
        })
        .collect::<Result<Vec<TankDaySummary>, _>>()?;

    let window = DayWindow::for_date(date);
    let token_stats = TokenStats::from_tokens(tokens.iter().filter(|t| window.contains(t.created_at)));

    Ok(DailyReport {
        date,
        total_revenue: checked_total(rows.iter().map(|r| r.revenue))?,
        total_dip_sales: checked_total(rows.iter().map(|r| r.dip_sales))?,
        total_totalizer_sales: checked_total(rows.iter().filter_map(|r| r.totalizer_sales))?,
        tanks: rows,
        token_stats,
    })
}

fn checked_total(mut values: impl Iterator<Item = Decimal>) -> Result<Decimal, ReconcileError> {
    values.try_fold(Decimal::ZERO, |total, v| {
        total.checked_add(v).ok_or(ReconcileError::Overflow)
    })
}

fn summarize_tank(tank: &Tank, reading: Option<&DipReading>) -> Result<TankDaySummary, ReconcileError> {
    let meters = reading.map(|r| r.meter_readings());
    let Reconciliation {
        dip_sales,
        totalizer_sales,
        difference,
        revenue,
    } = reconcile_for_report(meters.as_ref(), tank.unit_price())?;

    Ok(TankDaySummary {
        tank_id: tank.id,
        tank_number: tank.tank_number.clone(),
        fuel_code: tank.fuel_type.as_ref().map(|f| f.code.clone()),
        fuel_name: tank.fuel_type.as_ref().map(|f| f.name.clone()),
        unit_price: tank.unit_price(),
        has_reading: reading.is_some(),
        opening_dip: reading.and_then(|r| r.opening_dip),
        closing_dip: reading.and_then(|r| r.closing_dip),
        purchase_qty: reading.map(|r| r.purchase_qty).unwrap_or(Decimal::ZERO),
        dip_sales,
        totalizer_sales,
        difference,
        revenue,
    })
}
