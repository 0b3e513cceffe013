//! Station overview for the landing page

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use shared::{DayWindow, FuelToken, Tank, TankLevel, TokenStats};
use sqlx::PgPool;

use super::tank::fetch_active_tanks;
use super::token::fetch_tokens_in_window;
use crate::error::AppResult;

/// Dashboard service
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub station_name: String,
    pub date: NaiveDate,
    pub tanks: Vec<TankLevel>,
    pub low_stock_count: usize,
    pub token_stats: TokenStats,
    pub recent_tokens: Vec<FuelToken>,
}

/// Settings the dashboard is rendered with
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub station_name: String,
    pub low_stock_percent: i64,
    pub recent_token_count: usize,
}

/// Assemble the dashboard from today's tokens (most recent first)
pub fn build_dashboard(
    date: NaiveDate,
    tanks: &[Tank],
    todays_tokens: Vec<FuelToken>,
    options: &DashboardOptions,
) -> Dashboard {
    let levels: Vec<TankLevel> = tanks
        .iter()
        .map(|t| t.level(options.low_stock_percent))
        .collect();
    let token_stats = TokenStats::from_tokens(&todays_tokens);

    let mut recent_tokens = todays_tokens;
    recent_tokens.truncate(options.recent_token_count);

    Dashboard {
        station_name: options.station_name.clone(),
        date,
        low_stock_count: levels.iter().filter(|l| l.is_low).count(),
        tanks: levels,
        token_stats,
        recent_tokens,
    }
}

impl DashboardService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_dashboard(&self, options: &DashboardOptions) -> AppResult<Dashboard> {
        let today = Utc::now().date_naive();
        let tanks = fetch_active_tanks(&self.db).await?;
        let tokens = fetch_tokens_in_window(&self.db, DayWindow::for_date(today)).await?;

        Ok(build_dashboard(today, &tanks, tokens, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::TokenStatus;

    fn options() -> DashboardOptions {
        DashboardOptions {
            station_name: "Highway Fuels".to_string(),
            low_stock_percent: 30,
            recent_token_count: 2,
        }
    }

    fn tank(id: i64, stock: i64) -> Tank {
        Tank {
            id,
            tank_number: format!("T-{}", id),
            fuel_type_id: 1,
            capacity: Decimal::from(10000),
            current_stock: Decimal::from(stock),
            is_active: true,
            fuel_type: None,
        }
    }

    fn token(id: i64, status: TokenStatus) -> FuelToken {
        FuelToken {
            id,
            token_code: format!("TK{}", id),
            quantity: Decimal::from(10),
            amount: Decimal::from(950),
            status,
            created_at: Utc::now(),
            used_at: None,
            fuel_type: None,
            order: None,
        }
    }

    #[test]
    fn test_low_stock_and_stats() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let tokens = vec![
            token(3, TokenStatus::Used),
            token(2, TokenStatus::Paid),
            token(1, TokenStatus::Expired),
        ];
        let dashboard = build_dashboard(date, &[tank(1, 2900), tank(2, 3000)], tokens, &options());

        assert_eq!(dashboard.tanks[0].fill_percent, 29);
        assert!(dashboard.tanks[0].is_low);
        assert!(!dashboard.tanks[1].is_low);
        assert_eq!(dashboard.low_stock_count, 1);

        // Stats cover every token of the day, the list only the most recent
        assert_eq!(dashboard.token_stats.total, 3);
        assert_eq!(dashboard.token_stats.revenue, Decimal::from(950));
        assert_eq!(dashboard.recent_tokens.len(), 2);
        assert_eq!(dashboard.recent_tokens[0].id, 3);
    }
}
