//! Fuel token registry queries

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{filter_tokens, DayWindow, FuelToken, FuelTypeSummary, TokenOrder, TokenSearch, TokenStatus};
use sqlx::{PgExecutor, PgPool};

use crate::error::{AppError, AppResult};

/// Token service
#[derive(Clone)]
pub struct TokenService {
    db: PgPool,
}

/// Filtered registry page
#[derive(Debug, Serialize)]
pub struct TokenListing {
    /// Number of recent tokens the filter ran over
    pub scanned: usize,
    pub tokens: Vec<FuelToken>,
}

#[derive(Debug, sqlx::FromRow)]
struct FuelTokenRow {
    id: i64,
    token_code: String,
    quantity: Decimal,
    amount: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
    fuel_code: Option<String>,
    fuel_name: Option<String>,
    order_id: Option<i64>,
    customer_name: Option<String>,
    customer_phone: Option<String>,
}

impl TryFrom<FuelTokenRow> for FuelToken {
    type Error = AppError;

    fn try_from(row: FuelTokenRow) -> AppResult<Self> {
        let status = row
            .status
            .parse::<TokenStatus>()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let fuel_type = match (row.fuel_code, row.fuel_name) {
            (Some(code), Some(name)) => Some(FuelTypeSummary { code, name }),
            _ => None,
        };
        let order = match (row.order_id, row.customer_name) {
            (Some(id), Some(customer_name)) => Some(TokenOrder {
                id,
                customer_name,
                customer_phone: row.customer_phone,
            }),
            _ => None,
        };

        Ok(FuelToken {
            id: row.id,
            token_code: row.token_code,
            quantity: row.quantity,
            amount: row.amount,
            status,
            created_at: row.created_at,
            used_at: row.used_at,
            fuel_type,
            order,
        })
    }
}

const TOKEN_SELECT: &str = r#"
    SELECT ft.id, ft.token_code, ft.quantity, ft.amount, ft.status::text AS status,
           ft.created_at, ft.used_at,
           f.code AS fuel_code, f.name AS fuel_name,
           o.id AS order_id, o.customer_name, o.customer_phone
    FROM fuel_tokens ft
    LEFT JOIN fuel_types f ON f.id = ft.fuel_type_id
    LEFT JOIN token_orders o ON o.id = ft.order_id
"#;

/// Most recent tokens first, at most `limit`
pub(crate) async fn fetch_recent_tokens<'e, E>(executor: E, limit: i64) -> AppResult<Vec<FuelToken>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, FuelTokenRow>(&format!(
        "{} ORDER BY ft.created_at DESC LIMIT $1",
        TOKEN_SELECT
    ))
    .bind(limit)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(FuelToken::try_from).collect()
}

/// Tokens created inside a UTC day window, most recent first
pub(crate) async fn fetch_tokens_in_window<'e, E>(
    executor: E,
    window: DayWindow,
) -> AppResult<Vec<FuelToken>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, FuelTokenRow>(&format!(
        "{} WHERE ft.created_at >= $1 AND ft.created_at < $2 ORDER BY ft.created_at DESC",
        TOKEN_SELECT
    ))
    .bind(window.start)
    .bind(window.end)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(FuelToken::try_from).collect()
}

impl TokenService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Filter the `limit` most recent tokens by status and search text
    pub async fn list(&self, search: &TokenSearch, limit: u32) -> AppResult<TokenListing> {
        let recent = fetch_recent_tokens(&self.db, i64::from(limit)).await?;
        let tokens = filter_tokens(&recent, search).into_iter().cloned().collect();

        Ok(TokenListing {
            scanned: recent.len(),
            tokens,
        })
    }
}
