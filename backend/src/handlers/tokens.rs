//! Fuel token registry handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{clamp_token_limit, Action, Resource, TokenSearch, TokenStatusFilter};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::token::TokenListing;
use crate::services::TokenService;
use crate::AppState;

#[derive(Deserialize)]
pub struct TokenQuery {
    pub status: Option<String>, // "all", "paid", "used", "expired"
    pub q: Option<String>,
    pub limit: Option<u32>,
}

/// Recent tokens filtered by status and code/customer search
pub async fn list_tokens(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<TokenQuery>,
) -> AppResult<Json<TokenListing>> {
    current_user.0.require(Resource::Token, Action::View)?;

    let status = match query.status.as_deref() {
        None | Some("") => TokenStatusFilter::All,
        Some(s) => s
            .parse::<TokenStatusFilter>()
            .map_err(|e| AppError::validation("status", e.to_string()))?,
    };
    let search = TokenSearch::new(status, query.q.unwrap_or_default());
    let limit = clamp_token_limit(query.limit, state.config.station.token_list_limit);

    let service = TokenService::new(state.db);
    Ok(Json(service.list(&search, limit).await?))
}
