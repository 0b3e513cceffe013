//! Daily reconciliation of dip stock against totalizer meters
//!
//! Fuel sold in a day can be measured two ways:
//! - dip: stock at opening, plus deliveries, minus stock at closing
//! - totalizer: the pump meter's closing count minus its opening count
//!
//! Revenue is billed on the totalizer volume when both meter counts were
//! recorded and on the dip volume otherwise. The two measurements are
//! compared to surface leakage, theft or gauging mistakes.
//!
//! Inputs are not range checked, so every step uses checked arithmetic and
//! reports [`ReconcileError::Overflow`] instead of panicking.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difference (litres) above which dip and totalizer sales are flagged
pub const DEFAULT_DISCREPANCY_THRESHOLD: Decimal = Decimal::TEN;

/// Reconciliation could not be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("Reading values are too large to reconcile")]
    Overflow,
}

/// Raw gauge and meter values for one tank on one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeterReadings {
    pub opening_dip: Option<Decimal>,
    pub closing_dip: Option<Decimal>,
    pub purchase_qty: Option<Decimal>,
    pub opening_totalizer: Option<Decimal>,
    pub closing_totalizer: Option<Decimal>,
}

impl MeterReadings {
    /// All five values present and zero
    pub fn zeroed() -> Self {
        Self {
            opening_dip: Some(Decimal::ZERO),
            closing_dip: Some(Decimal::ZERO),
            purchase_qty: Some(Decimal::ZERO),
            opening_totalizer: Some(Decimal::ZERO),
            closing_totalizer: Some(Decimal::ZERO),
        }
    }

    /// `closing - opening` when both totalizer counts are present
    pub fn totalizer_sales(&self) -> Result<Option<Decimal>, ReconcileError> {
        match (self.opening_totalizer, self.closing_totalizer) {
            (Some(opening), Some(closing)) => closing
                .checked_sub(opening)
                .map(Some)
                .ok_or(ReconcileError::Overflow),
            _ => Ok(None),
        }
    }
}

/// Derived sales volumes and revenue for one tank-day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub dip_sales: Decimal,
    pub totalizer_sales: Option<Decimal>,
    /// `dip_sales - totalizer_sales`
    pub difference: Option<Decimal>,
    pub revenue: Decimal,
}

impl Reconciliation {
    /// Volume revenue is billed on
    pub fn billed_volume(&self) -> Decimal {
        self.totalizer_sales.unwrap_or(self.dip_sales)
    }

    /// Dip sales exceed totalizer sales by more than `threshold` litres
    pub fn has_discrepancy(&self, threshold: Decimal) -> bool {
        self.difference.map(|d| d > threshold).unwrap_or(false)
    }
}

/// Reconcile one tank-day.
///
/// Returns `None` until both opening and closing dips are present. Purchase
/// quantity defaults to zero.
pub fn reconcile(
    readings: &MeterReadings,
    unit_price: Decimal,
) -> Result<Option<Reconciliation>, ReconcileError> {
    match (readings.opening_dip, readings.closing_dip) {
        (Some(opening_dip), Some(closing_dip)) => {
            reconcile_dips(opening_dip, closing_dip, readings, unit_price).map(Some)
        }
        _ => Ok(None),
    }
}

/// Reconcile a tank-day for report aggregation.
///
/// A tank without a reading counts as all-zero inputs and contributes no
/// sales; a reading with a missing dip reads that dip as zero.
pub fn reconcile_for_report(
    readings: Option<&MeterReadings>,
    unit_price: Decimal,
) -> Result<Reconciliation, ReconcileError> {
    let inputs = readings.copied().unwrap_or_else(MeterReadings::zeroed);
    reconcile_dips(
        inputs.opening_dip.unwrap_or(Decimal::ZERO),
        inputs.closing_dip.unwrap_or(Decimal::ZERO),
        &inputs,
        unit_price,
    )
}

fn reconcile_dips(
    opening_dip: Decimal,
    closing_dip: Decimal,
    readings: &MeterReadings,
    unit_price: Decimal,
) -> Result<Reconciliation, ReconcileError> {
    let purchase_qty = readings.purchase_qty.unwrap_or(Decimal::ZERO);

    let dip_sales = opening_dip
        .checked_add(purchase_qty)
        .and_then(|stock| stock.checked_sub(closing_dip))
        .ok_or(ReconcileError::Overflow)?;
    let totalizer_sales = readings.totalizer_sales()?;
    let difference = totalizer_sales
        .map(|t| dip_sales.checked_sub(t).ok_or(ReconcileError::Overflow))
        .transpose()?;
    let revenue = totalizer_sales
        .unwrap_or(dip_sales)
        .checked_mul(unit_price)
        .ok_or(ReconcileError::Overflow)?;

    Ok(Reconciliation {
        dip_sales,
        totalizer_sales,
        difference,
        revenue,
    })
}
