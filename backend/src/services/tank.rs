//! Tank and fuel type lookups

use rust_decimal::Decimal;
use shared::{FuelType, Tank, TankLevel};
use sqlx::{PgExecutor, PgPool};

use crate::error::AppResult;

/// Tank service
#[derive(Clone)]
pub struct TankService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct FuelTypeRow {
    id: i64,
    code: String,
    name: String,
    price: Decimal,
}

impl From<FuelTypeRow> for FuelType {
    fn from(row: FuelTypeRow) -> Self {
        FuelType {
            id: row.id,
            code: row.code,
            name: row.name,
            price: row.price,
        }
    }
}

/// Tank joined with its fuel type; the fuel columns are null when the type is missing
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TankRow {
    id: i64,
    tank_number: String,
    fuel_type_id: i64,
    capacity: Decimal,
    current_stock: Decimal,
    is_active: bool,
    fuel_code: Option<String>,
    fuel_name: Option<String>,
    fuel_price: Option<Decimal>,
}

impl From<TankRow> for Tank {
    fn from(row: TankRow) -> Self {
        let fuel_type = match (row.fuel_code, row.fuel_name, row.fuel_price) {
            (Some(code), Some(name), Some(price)) => Some(FuelType {
                id: row.fuel_type_id,
                code,
                name,
                price,
            }),
            _ => None,
        };

        Tank {
            id: row.id,
            tank_number: row.tank_number,
            fuel_type_id: row.fuel_type_id,
            capacity: row.capacity,
            current_stock: row.current_stock,
            is_active: row.is_active,
            fuel_type,
        }
    }
}

const TANK_SELECT: &str = r#"
    SELECT t.id, t.tank_number, t.fuel_type_id, t.capacity, t.current_stock, t.is_active,
           f.code AS fuel_code, f.name AS fuel_name, f.price AS fuel_price
    FROM tanks t
    LEFT JOIN fuel_types f ON f.id = t.fuel_type_id
"#;

/// Active tanks ordered by tank number, with live fuel prices
pub(crate) async fn fetch_active_tanks<'e, E>(executor: E) -> AppResult<Vec<Tank>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, TankRow>(&format!(
        "{} WHERE t.is_active = TRUE ORDER BY t.tank_number",
        TANK_SELECT
    ))
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(Tank::from).collect())
}

/// Tanks with the given ids regardless of their active flag; unknown ids are absent
pub(crate) async fn fetch_tanks_by_id<'e, E>(executor: E, tank_ids: &[i64]) -> AppResult<Vec<Tank>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, TankRow>(&format!("{} WHERE t.id = ANY($1)", TANK_SELECT))
        .bind(tank_ids)
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(Tank::from).collect())
}

impl TankService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All fuel types with their current prices
    pub async fn list_fuel_types(&self) -> AppResult<Vec<FuelType>> {
        let rows = sqlx::query_as::<_, FuelTypeRow>(
            "SELECT id, code, name, price FROM fuel_types ORDER BY code",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(FuelType::from).collect())
    }

    pub async fn list_active_tanks(&self) -> AppResult<Vec<Tank>> {
        fetch_active_tanks(&self.db).await
    }

    /// Active tanks with fill percentage and low-stock flag
    pub async fn list_tank_levels(&self, low_stock_percent: i64) -> AppResult<Vec<TankLevel>> {
        let tanks = self.list_active_tanks().await?;
        Ok(tanks.iter().map(|t| t.level(low_stock_percent)).collect())
    }
}
