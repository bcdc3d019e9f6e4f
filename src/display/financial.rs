//! Financial summary formatting

use crate::config::settings::Settings;
use crate::services::Financials;

use super::{format_kg, format_kg_precise, format_money, underline};

/// Format the financial summary
pub fn format_financials(financials: &Financials, settings: &Settings) -> String {
    let symbol = settings.currency_symbol.as_str();
    let heading = "Financial Summary";

    let mut output = String::new();
    output.push_str(heading);
    output.push('\n');
    output.push_str(&underline(heading));
    output.push('\n');
    output.push_str(&format!(
        "Milk price:          {} / kg\n",
        format_money(symbol, settings.milk_price)
    ));
    output.push_str(&format!(
        "Total milk:          {}\n",
        format_kg(financials.total_quantity)
    ));
    output.push_str(&format!(
        "Average per animal:  {}\n",
        format_kg_precise(financials.avg_per_animal)
    ));
    output.push_str(&format!(
        "Total revenue:       {}\n",
        format_money(symbol, financials.total_revenue)
    ));
    output.push_str(&format!(
        "Avg daily revenue:   {}\n",
        format_money(symbol, financials.avg_daily_revenue)
    ));

    if settings.milk_price == 0.0 {
        output.push_str("\nNo milk price set. Set one with: milk price <PRICE>\n");
    }

    output
}

/// Format the running total line
pub fn format_total(total: f64, entry_count: usize) -> String {
    format!("Total milk: {} ({} entries)", format_kg(total), entry_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_financials() {
        let mut settings = Settings::default();
        settings.milk_price = 0.5;
        let financials = Financials {
            total_quantity: 30.0,
            total_revenue: 15.0,
            avg_daily_revenue: 7.5,
            avg_per_animal: 7.5,
        };

        let output = format_financials(&financials, &settings);
        assert!(output.contains("Milk price:          $0.50 / kg"));
        assert!(output.contains("Total milk:          30.0 kg"));
        assert!(output.contains("Total revenue:       $15.00"));
        assert!(output.contains("Avg daily revenue:   $7.50"));
        assert!(!output.contains("No milk price set"));
    }

    #[test]
    fn test_price_hint_when_unset() {
        let output = format_financials(&Financials::default(), &Settings::default());
        assert!(output.contains("No milk price set"));
        assert!(output.contains("Total revenue:       $0.00"));
    }

    #[test]
    fn test_format_total() {
        assert_eq!(format_total(42.26, 3), "Total milk: 42.3 kg (3 entries)");
    }
}
