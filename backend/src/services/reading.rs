//! Daily reading sheet and batch save

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    prepare_reading_batch, reconcile, validate_reading_date, DipReading, ReadingEntry,
    ReadingStatus, Reconciliation, Tank,
};
use sqlx::{PgExecutor, PgPool};

use super::tank::{fetch_active_tanks, fetch_tanks_by_id};
use crate::error::{AppError, AppResult};

/// Reading service
#[derive(Clone)]
pub struct ReadingService {
    db: PgPool,
}

/// Batch of entries for one date
#[derive(Debug, Deserialize)]
pub struct SaveReadingsInput {
    pub reading_date: NaiveDate,
    pub entries: Vec<ReadingEntry>,
}

/// Outcome of a committed batch
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct BatchSaveResult {
    pub reading_date: NaiveDate,
    pub saved: usize,
    pub skipped: usize,
    pub stock_updates: usize,
}

/// One active tank on the entry screen
#[derive(Debug, Serialize)]
pub struct ReadingSheetRow {
    pub tank_id: i64,
    pub tank_number: String,
    pub fuel_code: Option<String>,
    pub capacity: Decimal,
    pub unit_price: Decimal,
    pub reading: Option<DipReading>,
    /// Absent until both dips are recorded
    pub reconciliation: Option<Reconciliation>,
    pub has_discrepancy: bool,
}

#[derive(Debug, Serialize)]
pub struct ReadingSheet {
    pub reading_date: NaiveDate,
    pub rows: Vec<ReadingSheetRow>,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DipReadingRow {
    id: i64,
    tank_id: i64,
    reading_date: NaiveDate,
    opening_dip: Option<Decimal>,
    closing_dip: Option<Decimal>,
    opening_totalizer: Option<Decimal>,
    closing_totalizer: Option<Decimal>,
    purchase_qty: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DipReadingRow> for DipReading {
    type Error = AppError;

    fn try_from(row: DipReadingRow) -> AppResult<Self> {
        let status = row
            .status
            .parse::<ReadingStatus>()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(DipReading {
            id: row.id,
            tank_id: row.tank_id,
            reading_date: row.reading_date,
            opening_dip: row.opening_dip,
            closing_dip: row.closing_dip,
            opening_totalizer: row.opening_totalizer,
            closing_totalizer: row.closing_totalizer,
            purchase_qty: row.purchase_qty,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// All saved readings for one date
pub(crate) async fn fetch_readings_for_date<'e, E>(
    executor: E,
    date: NaiveDate,
) -> AppResult<Vec<DipReading>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, DipReadingRow>(
        r#"
        SELECT id, tank_id, reading_date, opening_dip, closing_dip,
               opening_totalizer, closing_totalizer, purchase_qty, status,
               created_at, updated_at
        FROM dip_readings
        WHERE reading_date = $1
        "#,
    )
    .bind(date)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(DipReading::try_from).collect()
}

/// Pair each tank with its reading for `date` and the entry-screen reconciliation
pub fn build_reading_sheet(
    date: NaiveDate,
    tanks: &[Tank],
    readings: &[DipReading],
    discrepancy_threshold: Decimal,
) -> AppResult<ReadingSheet> {
    let rows = tanks
        .iter()
        .map(|tank| -> AppResult<ReadingSheetRow> {
            let reading = readings
                .iter()
                .find(|r| r.tank_id == tank.id && r.reading_date == date)
                .cloned();
            let reconciliation = match &reading {
                Some(r) => reconcile(&r.meter_readings(), tank.unit_price())?,
                None => None,
            };

            Ok(ReadingSheetRow {
                tank_id: tank.id,
                tank_number: tank.tank_number.clone(),
                fuel_code: tank.fuel_type.as_ref().map(|f| f.code.clone()),
                capacity: tank.capacity,
                unit_price: tank.unit_price(),
                has_discrepancy: reconciliation
                    .map(|r| r.has_discrepancy(discrepancy_threshold))
                    .unwrap_or(false),
                reading,
                reconciliation,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ReadingSheet {
        reading_date: date,
        rows,
    })
}

impl ReadingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Entry sheet for a date: every active tank with its saved reading, if any
    pub async fn get_sheet(
        &self,
        date: NaiveDate,
        discrepancy_threshold: Decimal,
    ) -> AppResult<ReadingSheet> {
        let tanks = fetch_active_tanks(&self.db).await?;
        let readings = fetch_readings_for_date(&self.db, date).await?;
        build_reading_sheet(date, &tanks, &readings, discrepancy_threshold)
    }

    /// Save a batch of readings in one transaction.
    ///
    /// Every entry is validated before the first write. Any failure rolls the
    /// whole batch back and is returned as the single error.
    pub async fn save_batch(
        &self,
        input: SaveReadingsInput,
        submitted_by: i64,
    ) -> AppResult<BatchSaveResult> {
        validate_reading_date(input.reading_date, Utc::now().date_naive())
            .map_err(|m| AppError::validation("reading_date", m))?;

        let tank_ids: Vec<i64> = input
            .entries
            .iter()
            .filter(|e| !e.is_blank())
            .map(|e| e.tank_id)
            .collect();

        let mut tx = self.db.begin().await?;

        let tanks = fetch_tanks_by_id(&mut *tx, &tank_ids).await?;
        let upserts = prepare_reading_batch(input.reading_date, &input.entries, &tanks)?;
        let mut stock_updates = 0;

        for upsert in &upserts {
            sqlx::query(
                r#"
                INSERT INTO dip_readings (
                    tank_id, reading_date, opening_dip, closing_dip,
                    opening_totalizer, closing_totalizer, purchase_qty, status, submitted_by
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (tank_id, reading_date) DO UPDATE SET
                    opening_dip = EXCLUDED.opening_dip,
                    closing_dip = EXCLUDED.closing_dip,
                    opening_totalizer = EXCLUDED.opening_totalizer,
                    closing_totalizer = EXCLUDED.closing_totalizer,
                    purchase_qty = EXCLUDED.purchase_qty,
                    status = EXCLUDED.status,
                    submitted_by = EXCLUDED.submitted_by,
                    updated_at = NOW()
                "#,
            )
            .bind(upsert.tank_id)
            .bind(upsert.reading_date)
            .bind(upsert.opening_dip)
            .bind(upsert.closing_dip)
            .bind(upsert.opening_totalizer)
            .bind(upsert.closing_totalizer)
            .bind(upsert.purchase_qty)
            .bind(upsert.status.as_str())
            .bind(submitted_by)
            .execute(&mut *tx)
            .await?;

            if let Some(stock) = upsert.stock_update {
                sqlx::query("UPDATE tanks SET current_stock = $1 WHERE id = $2")
                    .bind(stock)
                    .bind(upsert.tank_id)
                    .execute(&mut *tx)
                    .await?;
                stock_updates += 1;
            }
        }

        tx.commit().await?;

        let result = BatchSaveResult {
            reading_date: input.reading_date,
            saved: upserts.len(),
            skipped: input.entries.len() - upserts.len(),
            stock_updates,
        };

        tracing::info!(
            reading_date = %result.reading_date,
            saved = result.saved,
            skipped = result.skipped,
            user_id = submitted_by,
            "Reading batch saved"
        );

        Ok(result)
    }
}
