//! WebAssembly module for the Fuel Station Dashboard
//!
//! Provides client-side computation for:
//! - The live reconciliation panel on the reading entry form
//! - Token registry filtering and summary counts
//! - Tank gauges and rupee/litre display formatting
//!
//! Structured values cross the boundary as JSON strings and amounts as
//! decimal strings, so no precision is lost to `f64`.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{FuelToken, MeterReadings, Reconciliation, TokenSearch, TokenStats, TokenStatusFilter};
use wasm_bindgen::prelude::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("fuel-station-wasm ready"));
}

fn to_js_error(message: String) -> JsValue {
    js_sys::Error::new(&message).into()
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, String> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("Invalid {}: {}", field, e))
}

#[derive(Serialize)]
struct ReconciliationView {
    /// `null` until both dips are entered
    reconciliation: Option<Reconciliation>,
    has_discrepancy: bool,
}

fn reconciliation_json(readings_json: &str, unit_price: &str, threshold: &str) -> Result<String, String> {
    let readings: MeterReadings = serde_json::from_str(readings_json)
        .map_err(|e| format!("Invalid readings JSON: {}", e))?;
    let price = parse_decimal("unit price", unit_price)?;
    let threshold = parse_decimal("threshold", threshold)?;

    let reconciliation = shared::reconcile(&readings, price).map_err(|e| e.to_string())?;
    let view = ReconciliationView {
        has_discrepancy: reconciliation
            .map(|r| r.has_discrepancy(threshold))
            .unwrap_or(false),
        reconciliation,
    };
    serde_json::to_string(&view).map_err(|e| e.to_string())
}

/// Reconcile one tank's form values.
///
/// `readings_json` holds `opening_dip`, `closing_dip`, `purchase_qty`,
/// `opening_totalizer` and `closing_totalizer`, any of which may be null.
#[wasm_bindgen]
pub fn calculate_reconciliation(
    readings_json: &str,
    unit_price: &str,
    threshold: &str,
) -> Result<String, JsValue> {
    reconciliation_json(readings_json, unit_price, threshold).map_err(to_js_error)
}

fn filter_tokens_json(tokens_json: &str, status: &str, query: &str) -> Result<String, String> {
    let tokens: Vec<FuelToken> = serde_json::from_str(tokens_json)
        .map_err(|e| format!("Invalid tokens JSON: {}", e))?;
    let status = if status.is_empty() {
        TokenStatusFilter::All
    } else {
        status.parse::<TokenStatusFilter>().map_err(|e| e.to_string())?
    };

    let matching = shared::filter_tokens(&tokens, &TokenSearch::new(status, query));
    serde_json::to_string(&matching).map_err(|e| e.to_string())
}

/// Filter a token list by status (`all`, `paid`, `used`, `expired`) and search text
#[wasm_bindgen]
pub fn filter_tokens(tokens_json: &str, status: &str, query: &str) -> Result<String, JsValue> {
    filter_tokens_json(tokens_json, status, query).map_err(to_js_error)
}

fn summarize_tokens_json(tokens_json: &str) -> Result<String, String> {
    let tokens: Vec<FuelToken> = serde_json::from_str(tokens_json)
        .map_err(|e| format!("Invalid tokens JSON: {}", e))?;
    serde_json::to_string(&TokenStats::from_tokens(&tokens)).map_err(|e| e.to_string())
}

/// Status counts and redeemed revenue for a token list
#[wasm_bindgen]
pub fn summarize_tokens(tokens_json: &str) -> Result<String, JsValue> {
    summarize_tokens_json(tokens_json).map_err(to_js_error)
}

/// Whole-number fill percentage for a tank gauge
#[wasm_bindgen]
pub fn tank_fill_percent(current_stock: &str, capacity: &str) -> Result<i32, JsValue> {
    let stock = parse_decimal("stock", current_stock).map_err(to_js_error)?;
    let capacity = parse_decimal("capacity", capacity).map_err(to_js_error)?;
    let percent = shared::fill_percent(stock, capacity);
    Ok(i32::try_from(percent).unwrap_or(if percent < 0 { i32::MIN } else { i32::MAX }))
}

/// Rupees with Indian digit grouping; unparseable input renders as `₹0`
#[wasm_bindgen]
pub fn format_currency(amount: &str) -> String {
    shared::format_currency(parse_decimal("amount", amount).unwrap_or(Decimal::ZERO))
}

/// Litres with two decimals; empty or unparseable input renders as `-`
#[wasm_bindgen]
pub fn format_quantity(liters: &str) -> String {
    shared::format_optional_quantity(parse_decimal("quantity", liters).ok())
}
