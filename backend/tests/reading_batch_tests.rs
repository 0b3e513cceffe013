//! Reading batch tests
//!
//! Tests for the daily reading batch including:
//! - Upsert per (tank, date): saving twice never duplicates a row
//! - Tank stock overwritten with the last saved closing dip
//! - A failing entry rejects the whole batch before anything is written
//! - Inactive tanks, blank duplicates and column precision

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{prepare_reading_batch, BatchError, FuelType, ReadingEntry, ReadingUpsert, Tank};
use std::collections::HashMap;

/// In-memory stand-in for the `dip_readings` and `tanks` tables
#[derive(Debug, Default)]
struct Station {
    readings: HashMap<(i64, NaiveDate), ReadingUpsert>,
    tanks: Vec<Tank>,
}

impl Station {
    fn with_tanks(count: i64, capacity: i64) -> Self {
        let tanks = (1..=count)
            .map(|id| Tank {
                id,
                tank_number: format!("T-{}", id),
                fuel_type_id: 1,
                capacity: Decimal::from(capacity),
                current_stock: Decimal::ZERO,
                is_active: true,
                fuel_type: Some(FuelType {
                    id: 1,
                    code: "DSL".to_string(),
                    name: "Diesel".to_string(),
                    price: Decimal::new(8975, 2),
                }),
            })
            .collect();
        Station {
            tanks,
            ..Default::default()
        }
    }

    fn stock(&self, tank_id: i64) -> Decimal {
        self.tanks
            .iter()
            .find(|t| t.id == tank_id)
            .map(|t| t.current_stock)
            .unwrap_or_default()
    }

    /// Prepare the batch exactly as the service does, then apply every write
    fn save(&mut self, date: NaiveDate, entries: &[ReadingEntry]) -> Result<usize, BatchError> {
        let plan = prepare_reading_batch(date, entries, &self.tanks)?;
        for upsert in &plan {
            if let Some(stock) = upsert.stock_update {
                if let Some(tank) = self.tanks.iter_mut().find(|t| t.id == upsert.tank_id) {
                    tank.current_stock = stock;
                }
            }
            self.readings
                .insert((upsert.tank_id, upsert.reading_date), upsert.clone());
        }
        Ok(plan.len())
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

fn entry(tank_id: i64, opening: i64, closing: i64) -> ReadingEntry {
    ReadingEntry {
        tank_id,
        opening_dip: Some(Decimal::from(opening)),
        closing_dip: Some(Decimal::from(closing)),
        ..Default::default()
    }
}

// ============================================================================
// Strategies
// ============================================================================

fn entry_strategy(tank_id: i64) -> impl Strategy<Value = ReadingEntry> {
    (
        proptest::option::of(0i64..20_000),
        proptest::option::of(0i64..20_000),
        proptest::option::of(0i64..5_000),
    )
        .prop_map(move |(opening, closing, purchase)| ReadingEntry {
            tank_id,
            opening_dip: opening.map(Decimal::from),
            closing_dip: closing.map(Decimal::from),
            purchase_qty: purchase.map(Decimal::from),
            ..Default::default()
        })
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Property 6: Re-saving a (tank, date) updates in place and overwrites stock
    #[test]
    fn test_resave_updates_existing_row(
        first in entry_strategy(1),
        second in entry_strategy(1),
        day in 1u32..28,
    ) {
        let mut station = Station::with_tanks(1, 20_000);
        station.save(date(day), &[first.clone()]).unwrap();
        station.save(date(day), &[second.clone()]).unwrap();

        let rows = station.readings.keys().filter(|(tank, _)| *tank == 1).count();
        let saved_any = !first.is_blank() || !second.is_blank();
        prop_assert_eq!(rows, usize::from(saved_any));

        if !second.is_blank() {
            let row = &station.readings[&(1, date(day))];
            prop_assert_eq!(row.closing_dip, second.closing_dip);
            prop_assert_eq!(row.purchase_qty, second.purchase_qty.unwrap_or(Decimal::ZERO));
        }

        // Stock follows the most recently saved closing dip
        let expected_stock = second
            .closing_dip
            .filter(|_| !second.is_blank())
            .or(first.closing_dip.filter(|_| !first.is_blank()))
            .unwrap_or(Decimal::ZERO);
        prop_assert_eq!(station.stock(1), expected_stock);
    }

    /// Property 7: One invalid entry aborts the batch; no earlier tank is written
    #[test]
    fn test_invalid_entry_aborts_batch(
        failing_index in 0usize..3,
        excess in 1i64..1000,
    ) {
        let mut station = Station::with_tanks(3, 10_000);
        let entries: Vec<ReadingEntry> = (0..3)
            .map(|i| {
                let tank_id = i as i64 + 1;
                if i == failing_index {
                    entry(tank_id, 9000, 10_000 + excess)
                } else {
                    entry(tank_id, 9000, 7000)
                }
            })
            .collect();

        let result = station.save(date(1), &entries);
        prop_assert_eq!(
            result,
            Err(BatchError::Invalid {
                tank_id: failing_index as i64 + 1,
                field: "closing_dip",
                message: "Dip exceeds tank capacity",
            })
        );
        prop_assert!(station.readings.is_empty());
        prop_assert!(station.tanks.iter().all(|t| t.current_stock.is_zero()));
    }

    /// Property: Readings on different dates are separate rows
    #[test]
    fn test_dates_are_independent(
        days in proptest::collection::btree_set(1u32..28, 1..6),
    ) {
        let mut station = Station::with_tanks(1, 20_000);
        for (i, day) in days.iter().enumerate() {
            station.save(date(*day), &[entry(1, 9000, 8000 - i as i64)]).unwrap();
        }
        prop_assert_eq!(station.readings.len(), days.len());
        prop_assert_eq!(station.stock(1), Decimal::from(8000 - (days.len() as i64 - 1)));
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_stock_overwrite_ignores_date_order() {
        let mut station = Station::with_tanks(1, 20_000);
        station.save(date(10), &[entry(1, 9000, 8000)]).unwrap();
        // Back-filling an earlier day still overwrites the stock
        station.save(date(9), &[entry(1, 9500, 9100)]).unwrap();
        assert_eq!(station.stock(1), Decimal::from(9100));
    }

    #[test]
    fn test_blank_tanks_are_skipped() {
        let mut station = Station::with_tanks(2, 20_000);
        let blank = ReadingEntry {
            tank_id: 2,
            closing_totalizer: Some(Decimal::from(5000)),
            ..Default::default()
        };
        assert_eq!(station.save(date(1), &[entry(1, 9000, 8000), blank]), Ok(1));
        assert!(!station.readings.contains_key(&(2, date(1))));
    }

    #[test]
    fn test_duplicate_tank_rejected() {
        let mut station = Station::with_tanks(1, 20_000);
        let result = station.save(date(1), &[entry(1, 9000, 8000), entry(1, 8000, 7000)]);
        assert_eq!(result, Err(BatchError::DuplicateTank(1)));
        assert!(station.readings.is_empty());
    }

    #[test]
    fn test_unknown_tank_rejected() {
        let mut station = Station::with_tanks(1, 20_000);
        assert_eq!(
            station.save(date(1), &[entry(7, 100, 50)]),
            Err(BatchError::UnknownTank(7))
        );
    }

    #[test]
    fn test_negative_purchase_rejected() {
        let mut station = Station::with_tanks(1, 20_000);
        let mut e = entry(1, 9000, 8000);
        e.purchase_qty = Some(Decimal::from(-1));
        assert!(matches!(
            station.save(date(1), &[e]),
            Err(BatchError::Invalid { field: "purchase_qty", .. })
        ));
    }

    #[test]
    fn test_inactive_tank_aborts_batch() {
        let mut station = Station::with_tanks(2, 20_000);
        station.tanks[1].is_active = false;

        let result = station.save(date(1), &[entry(1, 9000, 8000), entry(2, 9000, 8000)]);
        assert_eq!(result, Err(BatchError::InactiveTank(2)));
        assert!(station.readings.is_empty());
        assert_eq!(station.stock(1), Decimal::ZERO);
    }

    #[test]
    fn test_blank_entry_for_inactive_tank_is_skipped() {
        let mut station = Station::with_tanks(2, 20_000);
        station.tanks[1].is_active = false;
        let blank = ReadingEntry {
            tank_id: 2,
            ..Default::default()
        };
        assert_eq!(station.save(date(1), &[entry(1, 9000, 8000), blank]), Ok(1));
    }

    #[test]
    fn test_blank_duplicate_does_not_reject_batch() {
        let mut station = Station::with_tanks(1, 20_000);
        let blank = ReadingEntry {
            tank_id: 1,
            opening_totalizer: Some(Decimal::from(120)),
            ..Default::default()
        };
        assert_eq!(station.save(date(1), &[entry(1, 9000, 8000), blank]), Ok(1));
        assert_eq!(station.stock(1), Decimal::from(8000));
    }

    #[test]
    fn test_value_that_would_be_rounded_is_rejected() {
        let mut station = Station::with_tanks(1, 20_000);
        let mut e = entry(1, 9000, 8000);
        e.closing_dip = Some(Decimal::new(8_000_005, 3));
        assert_eq!(
            station.save(date(1), &[e]),
            Err(BatchError::Invalid {
                tank_id: 1,
                field: "closing_dip",
                message: "At most 2 decimal places are allowed",
            })
        );
        assert!(station.readings.is_empty());
    }

    #[test]
    fn test_oversized_totalizer_is_rejected() {
        let mut station = Station::with_tanks(1, 20_000);
        let mut e = entry(1, 9000, 8000);
        e.opening_totalizer = Some(Decimal::from(1_000_000_000_000i64));
        assert!(matches!(
            station.save(date(1), &[e]),
            Err(BatchError::Invalid { field: "opening_totalizer", .. })
        ));
    }
}
