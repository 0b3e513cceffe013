//! Authentication middleware
//!
//! JWT authentication and role-based access control middleware

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::{Action, AdminRole, Resource};

use crate::error::{AppError, AppResult};
use crate::services::auth::decode_access_token;
use crate::AppState;

/// Authenticated user information extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub name: String,
    pub role: AdminRole,
}

impl AuthUser {
    /// Check if the user's role allows an action on a resource
    pub fn can(&self, resource: Resource, action: Action) -> bool {
        self.role.permits(resource, action)
    }

    /// Permission guard for use in handlers
    pub fn require(&self, resource: Resource, action: Action) -> AppResult<()> {
        if self.can(resource, action) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = self.user_id,
                user = %self.name,
                role = self.role.as_str(),
                ?resource,
                ?action,
                "Permission denied"
            );
            Err(AppError::InsufficientPermissions)
        }
    }
}

/// Authentication middleware that validates JWT access tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Some(token) => token.to_string(),
        None => {
            return AppError::Unauthorized("Missing or invalid Authorization header".to_string())
                .into_response();
        }
    };

    let claims = match decode_access_token(&token, &state.config.jwt.secret) {
        Ok(claims) => claims,
        Err(e) => return e.into_response(),
    };

    let user_id = match claims.sub.parse::<i64>() {
        Ok(id) => id,
        Err(_) => return AppError::InvalidToken.into_response(),
    };

    request.extensions_mut().insert(AuthUser {
        user_id,
        name: claims.name,
        role: claims.role,
    });

    next.run(request).await
}

/// Token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
