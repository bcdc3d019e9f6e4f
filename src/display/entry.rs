//! Entry display formatting
//!
//! Formats entries for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Entry;

use super::{format_kg, format_kg_precise};

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Animals")]
    animals: u32,
    #[tabled(rename = "Per Animal")]
    per_animal: String,
}

impl From<&Entry> for EntryRow {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id.to_string(),
            date: entry.date.format("%Y-%m-%d %H:%M").to_string(),
            quantity: format_kg(entry.quantity),
            animals: entry.animal_count,
            per_animal: format_kg_precise(entry.per_animal),
        }
    }
}

/// Format entries as a table, in the order given
pub fn format_entry_table(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "No entries recorded.".to_string();
    }

    let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from).collect();
    Table::new(rows).with(Style::psql()).to_string()
}

/// Format a single entry for display
pub fn format_entry_details(entry: &Entry) -> String {
    let mut output = String::new();
    output.push_str(&format!("Entry:      {}\n", entry.id));
    output.push_str(&format!("Date:       {}\n", entry.date.format("%Y-%m-%d %H:%M")));
    output.push_str(&format!("Quantity:   {}\n", format_kg(entry.quantity)));
    output.push_str(&format!("Animals:    {}\n", entry.animal_count));
    output.push_str(&format!("Per animal: {}\n", format_kg_precise(entry.per_animal)));
    output
}
