//! Tank and fuel type handlers

use axum::{extract::State, Json};
use shared::{Action, FuelType, Resource, TankLevel};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::TankService;
use crate::AppState;

/// List fuel types with live prices
pub async fn list_fuel_types(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<FuelType>>> {
    current_user.0.require(Resource::Tank, Action::View)?;

    let service = TankService::new(state.db);
    Ok(Json(service.list_fuel_types().await?))
}

/// List active tanks with their stock levels
pub async fn list_tanks(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<TankLevel>>> {
    current_user.0.require(Resource::Tank, Action::View)?;

    let service = TankService::new(state.db);
    let levels = service
        .list_tank_levels(state.config.station.low_stock_percent)
        .await?;
    Ok(Json(levels))
}
