//! Daily reading entry handlers

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use shared::{Action, Resource};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::reading::{BatchSaveResult, ReadingSheet, SaveReadingsInput};
use crate::services::ReadingService;
use crate::AppState;

#[derive(Deserialize)]
pub struct ReadingQuery {
    /// Defaults to today (UTC)
    pub date: Option<NaiveDate>,
}

/// Reading sheet for a date
pub async fn get_readings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ReadingQuery>,
) -> AppResult<Json<ReadingSheet>> {
    current_user.0.require(Resource::Reading, Action::View)?;

    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let service = ReadingService::new(state.db);
    let sheet = service
        .get_sheet(date, state.config.station.discrepancy_threshold_liters)
        .await?;
    Ok(Json(sheet))
}

/// Save every tank's readings for a date in one batch
pub async fn save_readings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SaveReadingsInput>,
) -> AppResult<Json<BatchSaveResult>> {
    current_user.0.require(Resource::Reading, Action::Edit)?;

    let service = ReadingService::new(state.db);
    let result = service.save_batch(input, current_user.0.user_id).await?;
    Ok(Json(result))
}
