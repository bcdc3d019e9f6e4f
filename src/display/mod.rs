//! Display formatting for terminal output
//!
//! Formats entries and financial figures for the terminal. Quantities are
//! shown in kilograms with one decimal, money and per-animal figures with
//! two.

pub mod entry;
pub mod financial;

pub use entry::{format_entry_details, format_entry_table};
pub use financial::{format_financials, format_total};

/// Kilograms with one decimal
pub fn format_kg(quantity: f64) -> String {
    format!("{:.1} kg", quantity)
}

/// Per-animal kilograms with two decimals
pub fn format_kg_precise(quantity: f64) -> String {
    format!("{:.2} kg", quantity)
}

/// Amount of money with the configured currency symbol
pub fn format_money(symbol: &str, amount: f64) -> String {
    if amount < 0.0 {
        format!("-{}{:.2}", symbol, amount.abs())
    } else {
        format!("{}{:.2}", symbol, amount)
    }
}

/// Horizontal rule matching a heading's width
pub fn underline(heading: &str) -> String {
    "=".repeat(heading.chars().count())
}
