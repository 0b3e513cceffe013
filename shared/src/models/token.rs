//! Fuel token (voucher) models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::FuelTypeSummary;
use crate::types::ParseEnumError;

/// Voucher lifecycle: issued and unused, redeemed at the pump, or lapsed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    Paid,
    Used,
    Expired,
}

impl TokenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenStatus::Paid => "paid",
            TokenStatus::Used => "used",
            TokenStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(TokenStatus::Paid),
            "used" => Ok(TokenStatus::Used),
            "expired" => Ok(TokenStatus::Expired),
            other => Err(ParseEnumError::new("token status", other)),
        }
    }
}

/// Customer identity a token was issued to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenOrder {
    pub id: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
}

/// A fuel voucher with its embedded fuel type and order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelToken {
    pub id: i64,
    pub token_code: String,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub status: TokenStatus,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub fuel_type: Option<FuelTypeSummary>,
    pub order: Option<TokenOrder>,
}

/// Counts and redeemed revenue over a set of tokens
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenStats {
    pub total: i64,
    pub paid: i64,
    pub used: i64,
    pub expired: i64,
    /// Sum of `amount` over used tokens only
    pub revenue: Decimal,
}

impl TokenStats {
    pub fn from_tokens<'a, I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a FuelToken>,
    {
        tokens.into_iter().fold(Self::default(), |mut stats, token| {
            stats.total += 1;
            match token.status {
                TokenStatus::Paid => stats.paid += 1,
                TokenStatus::Used => {
                    stats.used += 1;
                    stats.revenue += token.amount;
                }
                TokenStatus::Expired => stats.expired += 1,
            }
            stats
        })
    }
}
