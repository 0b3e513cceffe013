//! Reporting handlers for the daily sales report and its export

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use shared::{Action, Resource};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::ReportingService;
use crate::AppState;

#[derive(Deserialize)]
pub struct DailyReportQuery {
    pub date: Option<NaiveDate>,
    pub format: Option<String>, // "json" or "csv"
}

/// Get the daily sales report
pub async fn get_daily_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<DailyReportQuery>,
) -> AppResult<Response> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let service = ReportingService::new(state.db.clone());

    match query.format.as_deref() {
        None | Some("json") => {
            current_user.0.require(Resource::Report, Action::View)?;
            let report = service.get_daily_report(date).await?;
            Ok(Json(report).into_response())
        }
        Some("csv") => {
            current_user.0.require(Resource::Report, Action::Export)?;
            let report = service.get_daily_report(date).await?;
            let csv = ReportingService::export_to_csv(&report.tanks)?;
            let disposition = format!("attachment; filename=\"daily_report_{}.csv\"", date);
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                csv,
            )
                .into_response())
        }
        Some(other) => Err(AppError::validation(
            "format",
            format!("Unsupported report format: {}", other),
        )),
    }
}
