//! Planning a day's batch of tank readings into persistence writes

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ReadingStatus, Tank};
use crate::reconciliation::{reconcile, MeterReadings, ReconcileError};
use crate::validation::validate_reading_entry;

/// Values typed into the reading form for one tank
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingEntry {
    pub tank_id: i64,
    pub opening_dip: Option<Decimal>,
    pub closing_dip: Option<Decimal>,
    pub opening_totalizer: Option<Decimal>,
    pub closing_totalizer: Option<Decimal>,
    pub purchase_qty: Option<Decimal>,
}

impl ReadingEntry {
    /// Neither dip was entered; the tank is skipped on save
    pub fn is_blank(&self) -> bool {
        self.opening_dip.is_none() && self.closing_dip.is_none()
    }

    pub fn meter_readings(&self) -> MeterReadings {
        MeterReadings {
            opening_dip: self.opening_dip,
            closing_dip: self.closing_dip,
            purchase_qty: self.purchase_qty,
            opening_totalizer: self.opening_totalizer,
            closing_totalizer: self.closing_totalizer,
        }
    }
}

/// One upsert keyed by (tank, date) plus the optional stock overwrite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingUpsert {
    pub tank_id: i64,
    pub reading_date: NaiveDate,
    pub opening_dip: Option<Decimal>,
    pub closing_dip: Option<Decimal>,
    pub opening_totalizer: Option<Decimal>,
    pub closing_totalizer: Option<Decimal>,
    pub purchase_qty: Decimal,
    pub status: ReadingStatus,
    /// New `current_stock` for the tank, set when a closing dip was entered
    pub stock_update: Option<Decimal>,
}

/// Why a batch was rejected before anything was written
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("Tank {0} appears more than once")]
    DuplicateTank(i64),

    #[error("Tank {0} not found")]
    UnknownTank(i64),

    #[error("Tank {0} is not active")]
    InactiveTank(i64),

    #[error("Tank {tank_id}: {message}")]
    Invalid {
        tank_id: i64,
        field: &'static str,
        message: &'static str,
    },

    #[error("Tank {tank_id}: {source}")]
    Unreconcilable {
        tank_id: i64,
        #[source]
        source: ReconcileError,
    },
}

/// Validate every non-blank entry against its tank, then plan the writes.
///
/// `tanks` must hold every tank referenced by a non-blank entry; an id that
/// is missing is reported as unknown. Nothing is planned when any entry
/// fails.
pub fn prepare_reading_batch(
    reading_date: NaiveDate,
    entries: &[ReadingEntry],
    tanks: &[Tank],
) -> Result<Vec<ReadingUpsert>, BatchError> {
    if let Some(tank_id) = find_duplicate_tank(entries) {
        return Err(BatchError::DuplicateTank(tank_id));
    }

    for entry in entries.iter().filter(|e| !e.is_blank()) {
        let tank = tanks
            .iter()
            .find(|t| t.id == entry.tank_id)
            .ok_or(BatchError::UnknownTank(entry.tank_id))?;

        if !tank.is_active {
            return Err(BatchError::InactiveTank(tank.id));
        }

        validate_reading_entry(entry, tank.capacity).map_err(|(field, message)| {
            BatchError::Invalid {
                tank_id: tank.id,
                field,
                message,
            }
        })?;

        // The saved row must reconcile when the sheet is rebuilt
        reconcile(&entry.meter_readings(), tank.unit_price()).map_err(|source| {
            BatchError::Unreconcilable {
                tank_id: tank.id,
                source,
            }
        })?;
    }

    Ok(plan_reading_batch(reading_date, entries))
}

/// Turn form entries into writes, in entry order, skipping blank tanks
pub fn plan_reading_batch(reading_date: NaiveDate, entries: &[ReadingEntry]) -> Vec<ReadingUpsert> {
    entries
        .iter()
        .filter(|e| !e.is_blank())
        .map(|e| ReadingUpsert {
            tank_id: e.tank_id,
            reading_date,
            opening_dip: e.opening_dip,
            closing_dip: e.closing_dip,
            opening_totalizer: e.opening_totalizer,
            closing_totalizer: e.closing_totalizer,
            purchase_qty: e.purchase_qty.unwrap_or(Decimal::ZERO),
            status: ReadingStatus::Submitted,
            stock_update: e.closing_dip,
        })
        .collect()
}

/// First tank id appearing more than once among the entries that will be saved
pub fn find_duplicate_tank(entries: &[ReadingEntry]) -> Option<i64> {
    let mut seen = std::collections::HashSet::new();
    entries
        .iter()
        .filter(|e| !e.is_blank())
        .map(|e| e.tank_id)
        .find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FuelType;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_blank_entries_are_skipped() {
        let entries = vec![
            ReadingEntry {
                tank_id: 1,
                opening_totalizer: Some(Decimal::from(10)),
                ..Default::default()
            },
            ReadingEntry {
                tank_id: 2,
                opening_dip: Some(Decimal::from(4000)),
                ..Default::default()
            },
        ];
        let plan = plan_reading_batch(date(), &entries);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].tank_id, 2);
    }

    #[test]
    fn test_purchase_defaults_and_stock_update() {
        let entries = vec![ReadingEntry {
            tank_id: 7,
            opening_dip: Some(Decimal::from(4000)),
            closing_dip: Some(Decimal::from(3100)),
            ..Default::default()
        }];
        let plan = plan_reading_batch(date(), &entries);

        assert_eq!(plan[0].purchase_qty, Decimal::ZERO);
        assert_eq!(plan[0].stock_update, Some(Decimal::from(3100)));
        assert_eq!(plan[0].status, ReadingStatus::Submitted);
        assert_eq!(plan[0].reading_date, date());
    }

    #[test]
    fn test_no_stock_update_without_closing_dip() {
        let entries = vec![ReadingEntry {
            tank_id: 7,
            opening_dip: Some(Decimal::from(4000)),
            ..Default::default()
        }];
        assert_eq!(plan_reading_batch(date(), &entries)[0].stock_update, None);
    }

    fn filled(tank_id: i64) -> ReadingEntry {
        ReadingEntry {
            tank_id,
            opening_dip: Some(Decimal::from(4000)),
            closing_dip: Some(Decimal::from(3100)),
            ..Default::default()
        }
    }

    fn tank(id: i64, price: Decimal) -> Tank {
        Tank {
            id,
            tank_number: format!("T-{}", id),
            fuel_type_id: 1,
            capacity: Decimal::from(10000),
            current_stock: Decimal::ZERO,
            is_active: true,
            fuel_type: Some(FuelType {
                id: 1,
                code: "PET".to_string(),
                name: "Petrol".to_string(),
                price,
            }),
        }
    }

    #[test]
    fn test_find_duplicate_tank() {
        let entries = vec![filled(1), filled(2), filled(1)];
        assert_eq!(find_duplicate_tank(&entries), Some(1));
        assert_eq!(find_duplicate_tank(&entries[..2]), None);
    }

    #[test]
    fn test_blank_duplicate_is_not_a_duplicate() {
        let blank = ReadingEntry {
            tank_id: 1,
            closing_totalizer: Some(Decimal::from(900)),
            ..Default::default()
        };
        let entries = vec![filled(1), blank];
        assert_eq!(find_duplicate_tank(&entries), None);

        let plan = prepare_reading_batch(date(), &entries, &[tank(1, Decimal::from(100))]).unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_prepare_rejects_inactive_tank() {
        let mut closed = tank(2, Decimal::from(100));
        closed.is_active = false;
        let result = prepare_reading_batch(
            date(),
            &[filled(1), filled(2)],
            &[tank(1, Decimal::from(100)), closed],
        );
        assert_eq!(result, Err(BatchError::InactiveTank(2)));
    }

    #[test]
    fn test_prepare_ignores_blank_entry_for_unknown_tank() {
        let blank = ReadingEntry {
            tank_id: 99,
            ..Default::default()
        };
        let plan = prepare_reading_batch(date(), &[filled(1), blank], &[tank(1, Decimal::ONE)]).unwrap();
        assert_eq!(plan.len(), 1);

        let result = prepare_reading_batch(date(), &[filled(99)], &[tank(1, Decimal::ONE)]);
        assert_eq!(result, Err(BatchError::UnknownTank(99)));
    }

    #[test]
    fn test_prepare_rejects_values_that_cannot_reconcile() {
        let result = prepare_reading_batch(date(), &[filled(1)], &[tank(1, Decimal::MAX)]);
        assert_eq!(
            result,
            Err(BatchError::Unreconcilable {
                tank_id: 1,
                source: ReconcileError::Overflow,
            })
        );
    }

    #[test]
    fn test_entry_meter_readings() {
        let mut entry = filled(1);
        entry.purchase_qty = Some(Decimal::from(500));
        let meters = entry.meter_readings();
        assert_eq!(meters.opening_dip, Some(Decimal::from(4000)));
        assert_eq!(meters.purchase_qty, Some(Decimal::from(500)));
        assert_eq!(meters.closing_totalizer, None);
    }
}
