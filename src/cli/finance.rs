//! Finance CLI commands

use clap::Subcommand;

use crate::display::{format_financials, format_money};
use crate::error::MilkResult;
use crate::models::input::parse_price;
use crate::services::Session;
use crate::storage::StateStore;

use super::warn_if_unsaved;

/// Finance subcommands
#[derive(Subcommand)]
pub enum FinanceCommands {
    /// Set the milk price per kilogram
    Price {
        /// Price per kilogram
        #[arg(allow_hyphen_values = true)]
        price: String,
    },

    /// Show revenue and per-animal figures
    Finance,
}

/// Handle a finance command
pub fn handle_finance_command<S: StateStore>(
    session: &mut Session<S>,
    cmd: FinanceCommands,
) -> MilkResult<()> {
    match cmd {
        FinanceCommands::Price { price } => {
            let price = parse_price(&price)?;
            let updated = session.set_milk_price(price)?;
            println!(
                "Milk price set to {} / kg",
                format_money(&session.settings().currency_symbol, updated.value)
            );
            warn_if_unsaved(&updated);
        }

        FinanceCommands::Finance => {
            print!(
                "{}",
                format_financials(&session.financials(), session.settings())
            );
        }
    }

    Ok(())
}
