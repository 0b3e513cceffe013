//! Status filter and free-text search over recent fuel tokens

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::{FuelToken, TokenStatus};
use crate::types::ParseEnumError;

/// Upper bound on tokens returned by a listing
pub const MAX_TOKEN_LIST_LIMIT: u32 = 100;

/// `all` or one token status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatusFilter {
    #[default]
    All,
    Paid,
    Used,
    Expired,
}

impl TokenStatusFilter {
    pub fn matches(&self, status: TokenStatus) -> bool {
        match self {
            TokenStatusFilter::All => true,
            TokenStatusFilter::Paid => status == TokenStatus::Paid,
            TokenStatusFilter::Used => status == TokenStatus::Used,
            TokenStatusFilter::Expired => status == TokenStatus::Expired,
        }
    }
}

impl FromStr for TokenStatusFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TokenStatusFilter::All),
            "paid" => Ok(TokenStatusFilter::Paid),
            "used" => Ok(TokenStatusFilter::Used),
            "expired" => Ok(TokenStatusFilter::Expired),
            other => Err(ParseEnumError::new("token status filter", other)),
        }
    }
}

/// Filter criteria for the token registry view
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenSearch {
    #[serde(default)]
    pub status: TokenStatusFilter,
    #[serde(default)]
    pub query: String,
}

impl TokenSearch {
    pub fn new(status: TokenStatusFilter, query: impl Into<String>) -> Self {
        Self {
            status,
            query: query.into(),
        }
    }

    /// Status must match; a non-empty query must hit the code or the customer name.
    ///
    /// Codes are stored uppercase, so the query is uppercased before the
    /// substring check. Names are compared case-insensitively.
    pub fn matches(&self, token: &FuelToken) -> bool {
        if !self.status.matches(token.status) {
            return false;
        }
        if self.query.is_empty() {
            return true;
        }

        let code_hit = token.token_code.contains(&self.query.to_uppercase());
        let name_hit = token
            .order
            .as_ref()
            .map(|o| {
                o.customer_name
                    .to_lowercase()
                    .contains(&self.query.to_lowercase())
            })
            .unwrap_or(false);

        code_hit || name_hit
    }
}

/// Tokens passing `search`, in their input order
pub fn filter_tokens<'a>(tokens: &'a [FuelToken], search: &TokenSearch) -> Vec<&'a FuelToken> {
    tokens.iter().filter(|t| search.matches(t)).collect()
}

/// Requested listing size clamped to `1..=MAX_TOKEN_LIST_LIMIT`
pub fn clamp_token_limit(requested: Option<u32>, default: u32) -> u32 {
    requested
        .unwrap_or(default)
        .clamp(1, MAX_TOKEN_LIST_LIMIT)
}
