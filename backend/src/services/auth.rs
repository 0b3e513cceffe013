//! Authentication service for admin login, sessions and token management

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared::{validate_email, validate_password, AdminProfile, AdminRole, SessionStatus};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::config::{BootstrapConfig, Config};
use crate::error::{AppError, AppResult};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Admin user ID
    pub name: String,
    pub role: AdminRole,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: AdminProfile,
}

/// Input for creating an admin or supervisor account
#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: AdminRole,
}

/// User info from database
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    role: String,
    password_hash: String,
    is_active: bool,
}

impl UserRow {
    fn profile(&self) -> AppResult<AdminProfile> {
        let role = self
            .role
            .parse::<AdminRole>()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(AdminProfile {
            id: self.id,
            name: self.name.clone(),
            role,
        })
    }
}

/// Session lookup row
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: i64,
    user_id: i64,
    expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Authenticate an admin with email and password
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthTokens> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, role::text AS role, password_hash, is_active
            FROM admin_users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            tracing::warn!(user_id = user.id, "Failed login attempt");
            return Err(AppError::InvalidCredentials);
        }

        sqlx::query("UPDATE admin_users SET last_login_at = NOW() WHERE id = $1")
            .bind(user.id)
            .execute(&self.db)
            .await?;

        let profile = user.profile()?;
        let tokens = self.generate_tokens(profile)?;
        self.store_session(&self.db, tokens.user.id, &tokens.refresh_token)
            .await?;

        tracing::info!(user_id = tokens.user.id, role = tokens.user.role.as_str(), "Admin logged in");
        Ok(tokens)
    }

    /// Rotate a refresh token: the presented session is revoked and a new one issued
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        let token_hash = hash_token(refresh_token);

        let session = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, expires_at, revoked_at
            FROM admin_sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidToken)?;

        match SessionStatus::evaluate(session.expires_at, session.revoked_at, Utc::now()) {
            SessionStatus::Active => {}
            SessionStatus::Expired => return Err(AppError::TokenExpired),
            SessionStatus::Revoked => {
                return Err(AppError::Unauthorized("Session has been revoked".to_string()))
            }
        }

        let user = self.find_active_user(session.user_id).await?;
        let tokens = self.generate_tokens(user.profile()?)?;

        let mut tx = self.db.begin().await?;

        // Only the first of two concurrent refreshes finds the session unrevoked
        let revoked = sqlx::query(
            "UPDATE admin_sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(session.id)
        .execute(&mut *tx)
        .await?;
        ensure_session_claimed(revoked.rows_affected())?;

        self.store_session(&mut *tx, tokens.user.id, &tokens.refresh_token)
            .await?;
        tx.commit().await?;

        tracing::debug!(user_id = tokens.user.id, session_id = session.id, "Refresh token rotated");
        Ok(tokens)
    }

    /// Revoke the session behind a refresh token
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE admin_sessions SET revoked_at = NOW() WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(hash_token(refresh_token))
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::InvalidToken);
        }
        Ok(())
    }

    /// Current profile of a signed-in user, re-read from the database
    pub async fn get_profile(&self, user_id: i64) -> AppResult<AdminProfile> {
        self.find_active_user(user_id).await?.profile()
    }

    /// Create an admin or supervisor account
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<AdminProfile> {
        validate_email(&input.email).map_err(|m| AppError::validation("email", m))?;
        validate_password(&input.password).map_err(|m| AppError::validation("password", m))?;
        if input.name.trim().is_empty() {
            return Err(AppError::validation("name", "Name is required"));
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM admin_users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO admin_users (email, name, role, password_hash)
            VALUES ($1, $2, $3::admin_role, $4)
            RETURNING id
            "#,
        )
        .bind(&input.email)
        .bind(input.name.trim())
        .bind(input.role.as_str())
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(user_id = id, role = input.role.as_str(), "Admin user created");

        Ok(AdminProfile {
            id,
            name: input.name.trim().to_string(),
            role: input.role,
        })
    }

    /// Create the configured admin account when no admin exists yet
    pub async fn ensure_bootstrap_admin(&self, bootstrap: &BootstrapConfig) -> AppResult<()> {
        let admins = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM admin_users WHERE role = 'admin'",
        )
        .fetch_one(&self.db)
        .await?;

        if admins > 0 {
            return Ok(());
        }

        self.create_user(CreateUserInput {
            email: bootstrap.admin_email.clone(),
            password: bootstrap.admin_password.clone(),
            name: bootstrap.admin_name.clone(),
            role: AdminRole::Admin,
        })
        .await
        .map_err(|e| AppError::Configuration(format!("bootstrap admin: {}", e)))?;

        tracing::info!("Bootstrap admin account created");
        Ok(())
    }

    async fn find_active_user(&self, user_id: i64) -> AppResult<UserRow> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, role::text AS role, password_hash, is_active FROM admin_users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        if !user.is_active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }
        Ok(user)
    }

    /// Generate access and refresh tokens
    fn generate_tokens(&self, user: AdminProfile) -> AppResult<AuthTokens> {
        let access_token = issue_access_token(&user, &self.jwt_secret, self.access_token_expiry)?;

        // Refresh token (opaque random token, stored hashed)
        let refresh_token = Uuid::new_v4().to_string();

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
            user,
        })
    }

    /// Store refresh-token session in database
    async fn store_session<'e, E>(&self, executor: E, user_id: i64, token: &str) -> AppResult<()>
    where
        E: PgExecutor<'e>,
    {
        let expires_at = Utc::now() + Duration::seconds(self.refresh_token_expiry);

        sqlx::query(
            r#"
            INSERT INTO admin_sessions (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(hash_token(token))
        .bind(expires_at)
        .execute(executor)
        .await?;

        Ok(())
    }
}

/// The rotating request must be the one that revoked the presented session
fn ensure_session_claimed(rows_revoked: u64) -> AppResult<()> {
    if rows_revoked == 0 {
        return Err(AppError::Unauthorized("Session has been revoked".to_string()));
    }
    Ok(())
}

/// Sign an access token for `user` valid for `expiry_seconds`
pub fn issue_access_token(user: &AdminProfile, secret: &str, expiry_seconds: i64) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        name: user.name.clone(),
        role: user.role,
        exp: (now + Duration::seconds(expiry_seconds)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Decode and validate an access token
pub fn decode_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })
}

/// SHA-256 of a refresh token, base64url encoded, for storage
fn hash_token(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}
