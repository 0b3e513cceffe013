//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use shared::{Action, AdminProfile, AdminRole, Resource};
use validator::Validate;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthTokens, CreateUserInput};
use crate::services::AuthService;
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: AdminProfile,
}

impl From<AuthTokens> for LoginResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            user: tokens.user,
        }
    }
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub role: AdminRole,
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    body.validate()?;

    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let tokens = auth_service.login(&body.email, &body.password).await?;

    Ok(Json(tokens.into()))
}

/// Refresh token endpoint handler
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let tokens = auth_service.refresh_token(&body.refresh_token).await?;

    Ok(Json(tokens.into()))
}

/// Logout endpoint handler
pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<StatusCode, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    auth_service.logout(&body.refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Signed-in user's profile
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<AdminProfile>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let profile = auth_service.get_profile(current_user.0.user_id).await?;

    Ok(Json(profile))
}

/// Create an admin or supervisor account (admin only)
pub async fn create_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<AdminProfile>), AppError> {
    current_user.0.require(Resource::User, Action::Create)?;
    body.validate()?;

    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let profile = auth_service
        .create_user(CreateUserInput {
            email: body.email,
            password: body.password,
            name: body.name,
            role: body.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}
