//! Display formatting for quantities and rupee amounts

use rust_decimal::{Decimal, RoundingStrategy};

/// Litres with two decimals, e.g. `1234.50 L`
pub fn format_quantity(liters: Decimal) -> String {
    format!(
        "{:.2} L",
        liters.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Optional litres, `-` when unavailable
pub fn format_optional_quantity(liters: Option<Decimal>) -> String {
    liters.map(format_quantity).unwrap_or_else(|| "-".to_string())
}

/// Whole rupees with Indian digit grouping, e.g. `₹12,34,567`
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();

    let grouped = group_indian(&digits);
    if negative {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

/// Last three digits, then groups of two
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(dec("1234.5")), "1234.50 L");
        assert_eq!(format_quantity(dec("0")), "0.00 L");
        assert_eq!(format_quantity(dec("-12.345")), "-12.35 L");
    }

    #[test]
    fn test_format_optional_quantity() {
        assert_eq!(format_optional_quantity(None), "-");
        assert_eq!(format_optional_quantity(Some(dec("3"))), "3.00 L");
    }

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(dec("0")), "₹0");
        assert_eq!(format_currency(dec("999")), "₹999");
        assert_eq!(format_currency(dec("1000")), "₹1,000");
        assert_eq!(format_currency(dec("123456")), "₹1,23,456");
        assert_eq!(format_currency(dec("1234567.5")), "₹12,34,568");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec("-1500")), "-₹1,500");
        assert_eq!(format_currency(dec("-0.2")), "₹0");
    }
}
