//! Entry log export
//!
//! Every recorded entry as one plain-text line, oldest first.

use crate::models::Entry;

/// Render the entry log
pub fn render(entries: &[Entry]) -> String {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.date);

    let mut output = String::from("Milk Input Report\n\n");
    for entry in sorted {
        output.push_str(&format!(
            "Date: {}, Milk: {} kg\n",
            entry.date.format("%Y-%m-%d %H:%M"),
            entry.quantity
        ));
    }
    output
}
