//! Dashboard handler

use axum::{extract::State, Json};
use shared::{Action, Resource};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::dashboard::{Dashboard, DashboardOptions};
use crate::services::DashboardService;
use crate::AppState;

/// Today's token stats, tank levels and most recent tokens
pub async fn get_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Dashboard>> {
    current_user.0.require(Resource::Dashboard, Action::View)?;

    let station = &state.config.station;
    let options = DashboardOptions {
        station_name: station.name.clone(),
        low_stock_percent: station.low_stock_percent,
        recent_token_count: station.recent_token_count,
    };

    let service = DashboardService::new(state.db.clone());
    Ok(Json(service.get_dashboard(&options).await?))
}
