//! Route definitions for the Fuel Station Dashboard

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes
        .merge(station_routes(state))
}

/// Authentication routes; login, refresh and logout are public
fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route("/users", post(handlers::create_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/logout", post(handlers::logout))
        .merge(protected)
}

/// Station data routes (protected)
fn station_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/fuel-types", get(handlers::list_fuel_types))
        .route("/tanks", get(handlers::list_tanks))
        .route(
            "/readings",
            get(handlers::get_readings).put(handlers::save_readings),
        )
        .route("/tokens", get(handlers::list_tokens))
        .route("/reports/daily", get(handlers::get_daily_report))
        .route("/dashboard", get(handlers::get_dashboard))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
