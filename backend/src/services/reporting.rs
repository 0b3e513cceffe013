//! Daily sales reporting and CSV export

use chrono::NaiveDate;
use serde::Serialize;
use shared::{aggregate_daily_report, DailyReport, DayWindow};
use sqlx::PgPool;

use super::reading::fetch_readings_for_date;
use super::tank::fetch_active_tanks;
use super::token::fetch_tokens_in_window;
use crate::error::{AppError, AppResult};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Per-tank reconciliation and token totals for one calendar day
    pub async fn get_daily_report(&self, date: NaiveDate) -> AppResult<DailyReport> {
        let tanks = fetch_active_tanks(&self.db).await?;
        let readings = fetch_readings_for_date(&self.db, date).await?;
        let tokens = fetch_tokens_in_window(&self.db, DayWindow::for_date(date)).await?;

        let report = aggregate_daily_report(date, &tanks, &readings, &tokens)?;

        tracing::debug!(
            %date,
            tanks = report.tanks.len(),
            tokens = report.token_stats.total,
            total_revenue = %report.total_revenue,
            "Daily report built"
        );

        Ok(report)
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}
