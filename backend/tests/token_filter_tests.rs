//! Token registry filter tests
//!
//! Tests for status filtering and code/customer search including:
//! - The Ravi/Sana registry example
//! - Filtered results are always a subset in input order
//! - Listing limit clamping

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    clamp_token_limit, filter_tokens, FuelToken, TokenOrder, TokenSearch, TokenStatus,
    TokenStatusFilter, MAX_TOKEN_LIST_LIMIT,
};

fn token(id: i64, code: &str, status: TokenStatus, customer: Option<&str>) -> FuelToken {
    FuelToken {
        id,
        token_code: code.to_string(),
        quantity: Decimal::from(10),
        amount: Decimal::from(1000),
        status,
        created_at: Utc::now(),
        used_at: None,
        fuel_type: None,
        order: customer.map(|name| TokenOrder {
            id,
            customer_name: name.to_string(),
            customer_phone: None,
        }),
    }
}

fn registry() -> Vec<FuelToken> {
    vec![
        token(1, "ABC123", TokenStatus::Paid, Some("Ravi")),
        token(2, "XYZ999", TokenStatus::Used, Some("Sana")),
    ]
}

fn ids(tokens: &[&FuelToken]) -> Vec<i64> {
    tokens.iter().map(|t| t.id).collect()
}

// ============================================================================
// Strategies
// ============================================================================

fn status_strategy() -> impl Strategy<Value = TokenStatus> {
    prop_oneof![
        Just(TokenStatus::Paid),
        Just(TokenStatus::Used),
        Just(TokenStatus::Expired),
    ]
}

fn filter_strategy() -> impl Strategy<Value = TokenStatusFilter> {
    prop_oneof![
        Just(TokenStatusFilter::All),
        Just(TokenStatusFilter::Paid),
        Just(TokenStatusFilter::Used),
        Just(TokenStatusFilter::Expired),
    ]
}

fn token_strategy() -> impl Strategy<Value = FuelToken> {
    (
        1i64..10_000,
        "[A-Z0-9]{6}",
        status_strategy(),
        proptest::option::of("[A-Za-z]{3,12}"),
    )
        .prop_map(|(id, code, status, customer)| token(id, &code, status, customer.as_deref()))
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Property: Results are the matching subset in input order
    #[test]
    fn test_filter_is_ordered_subset(
        tokens in proptest::collection::vec(token_strategy(), 0..30),
        status in filter_strategy(),
        query in "[a-zA-Z0-9]{0,3}",
    ) {
        let search = TokenSearch::new(status, query);
        let result = filter_tokens(&tokens, &search);

        let expected: Vec<i64> = tokens.iter().filter(|t| search.matches(t)).map(|t| t.id).collect();
        prop_assert_eq!(ids(&result), expected);
        for t in &result {
            prop_assert!(status.matches(t.status));
        }
    }

    /// Property: Empty query with `all` returns everything
    #[test]
    fn test_empty_search_keeps_all(
        tokens in proptest::collection::vec(token_strategy(), 0..30),
    ) {
        let result = filter_tokens(&tokens, &TokenSearch::default());
        prop_assert_eq!(result.len(), tokens.len());
    }

    /// Property: Search on a token's own code always finds it, in any case
    #[test]
    fn test_code_search_case_insensitive(
        token in token_strategy(),
    ) {
        let query = token.token_code[1..4].to_lowercase();
        let tokens = vec![token];
        let result = filter_tokens(&tokens, &TokenSearch::new(TokenStatusFilter::All, query));
        prop_assert_eq!(result.len(), 1);
    }

    /// Property: Listing limit never exceeds the cap
    #[test]
    fn test_limit_clamped(
        requested in proptest::option::of(0u32..10_000),
        default in 1u32..=100,
    ) {
        let limit = clamp_token_limit(requested, default);
        prop_assert!(limit >= 1);
        prop_assert!(limit <= MAX_TOKEN_LIST_LIMIT);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_status_filter_used() {
        let tokens = registry();
        let result = filter_tokens(&tokens, &TokenSearch::new(TokenStatusFilter::Used, ""));
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_lowercase_code_search() {
        let tokens = registry();
        let result = filter_tokens(&tokens, &TokenSearch::new(TokenStatusFilter::All, "abc"));
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_customer_name_search() {
        let tokens = registry();
        let result = filter_tokens(&tokens, &TokenSearch::new(TokenStatusFilter::All, "sAnA"));
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_status_and_query_combine() {
        let tokens = registry();
        let result = filter_tokens(&tokens, &TokenSearch::new(TokenStatusFilter::Used, "abc"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_token_without_order_matches_by_code_only() {
        let tokens = vec![token(5, "QRS777", TokenStatus::Paid, None)];
        assert_eq!(
            filter_tokens(&tokens, &TokenSearch::new(TokenStatusFilter::All, "qrs")).len(),
            1
        );
        assert!(filter_tokens(&tokens, &TokenSearch::new(TokenStatusFilter::All, "ravi")).is_empty());
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!("all".parse::<TokenStatusFilter>().unwrap(), TokenStatusFilter::All);
        assert_eq!("expired".parse::<TokenStatusFilter>().unwrap(), TokenStatusFilter::Expired);
        assert!("refunded".parse::<TokenStatusFilter>().is_err());
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(clamp_token_limit(None, 100), 100);
        assert_eq!(clamp_token_limit(Some(500), 100), MAX_TOKEN_LIST_LIMIT);
        assert_eq!(clamp_token_limit(Some(0), 100), 1);
    }
}
