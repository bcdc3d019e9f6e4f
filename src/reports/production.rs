//! Production Report
//!
//! Milk production over a date range, grouped by day, week or month, with
//! renderers for the terminal, plain text, printable HTML and CSV.

use chrono::{NaiveDate, NaiveDateTime};
use std::io::Write;

use crate::error::{MilkError, MilkResult};
use crate::models::{Entry, Granularity};
use crate::services::aggregate::{filter_by_date_range, group_by, total_quantity, Group};

/// One group of the report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Group label, e.g. `5/3/2024`, `Week 10, 2024` or `March 2024`
    pub label: String,
    /// Summed quantity in kilograms
    pub quantity: f64,
    /// Mean animal count per entry, rounded
    pub avg_animal_count: u64,
    /// Quantity per animal across the group
    pub per_animal: f64,
    /// Number of entries in the group
    pub entries: usize,
}

impl From<&Group> for ReportRow {
    fn from(group: &Group) -> Self {
        Self {
            label: group.key.to_string(),
            quantity: group.quantity,
            avg_animal_count: group.avg_animal_count(),
            per_animal: group.per_animal(),
            entries: group.entries,
        }
    }
}

/// Production Report
#[derive(Debug, Clone)]
pub struct ProductionReport {
    /// First day of the range
    pub start_date: NaiveDate,
    /// Last day of the range (inclusive)
    pub end_date: NaiveDate,
    /// Grouping used for the rows
    pub granularity: Granularity,
    /// Total quantity in range
    pub total_quantity: f64,
    /// Calendar days in the range, both ends included
    pub days_in_range: i64,
    /// Total quantity divided by days in range
    pub average_per_day: f64,
    /// Number of entries in range
    pub entry_count: usize,
    /// One row per group, in order of first occurrence
    pub rows: Vec<ReportRow>,
}

/// Result of generating a report
#[derive(Debug, Clone)]
pub enum ReportOutcome {
    /// No entries fell inside the range
    Empty { start_date: NaiveDate, end_date: NaiveDate },
    /// A populated report
    Report(ProductionReport),
}

impl ReportOutcome {
    /// The report, if any entries were found
    pub fn report(&self) -> Option<&ProductionReport> {
        match self {
            ReportOutcome::Report(report) => Some(report),
            ReportOutcome::Empty { .. } => None,
        }
    }

    /// Message shown for an empty range
    pub fn empty_message(start_date: NaiveDate, end_date: NaiveDate) -> String {
        format!(
            "No entries found between {} and {}.",
            start_date.format("%-d/%-m/%Y"),
            end_date.format("%-d/%-m/%Y")
        )
    }

    /// Format for terminal display
    pub fn format_terminal(&self) -> String {
        match self {
            ReportOutcome::Report(report) => report.format_terminal(),
            ReportOutcome::Empty {
                start_date,
                end_date,
            } => format!("{}\n", Self::empty_message(*start_date, *end_date)),
        }
    }
}

impl ProductionReport {
    /// Generate a report over `entries`
    ///
    /// `end` covers its whole calendar day. Rows follow the order of
    /// `entries`; sort beforehand for chronological rows.
    pub fn generate(
        entries: &[Entry],
        start: NaiveDateTime,
        end: NaiveDateTime,
        granularity: Granularity,
    ) -> MilkResult<ReportOutcome> {
        let filtered = filter_by_date_range(entries, start, end)?;
        let start_date = start.date();
        let end_date = end.date();

        if filtered.is_empty() {
            tracing::debug!(%start_date, %end_date, "No entries in report range");
            return Ok(ReportOutcome::Empty {
                start_date,
                end_date,
            });
        }

        let total_quantity = total_quantity(&filtered);
        let days_in_range = (end_date - start_date).num_days() + 1;
        let average_per_day = total_quantity / days_in_range.max(1) as f64;

        let rows = group_by(&filtered, granularity)
            .iter()
            .map(ReportRow::from)
            .collect();

        Ok(ReportOutcome::Report(Self {
            start_date,
            end_date,
            granularity,
            total_quantity,
            days_in_range,
            average_per_day,
            entry_count: filtered.len(),
            rows,
        }))
    }

    fn period(&self) -> String {
        format!(
            "{} to {}",
            self.start_date.format("%-d/%-m/%Y"),
            self.end_date.format("%-d/%-m/%Y")
        )
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Milk Production Report ({}): {}\n",
            self.granularity,
            self.period()
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Total Milk: {:.1} kg\n", self.total_quantity));
        output.push_str(&format!(
            "Average per Day: {:.1} kg ({} days)\n\n",
            self.average_per_day, self.days_in_range
        ));

        output.push_str(&format!(
            "{:<20} {:>14} {:>8} {:>16}\n",
            self.granularity.column_heading(),
            "Quantity (kg)",
            "Animals",
            "Per Animal (kg)"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<20} {:>14.1} {:>8} {:>16.2}\n",
                row.label, row.quantity, row.avg_animal_count, row.per_animal
            ));
        }

        output
    }

    /// Plain-text export
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str("Milk Production Report\n");
        output.push_str(&format!("Period: {}\n", self.period()));
        output.push_str(&format!("Total Milk: {:.1} kg\n", self.total_quantity));
        output.push_str(&format!("Average per Day: {:.1} kg\n\n", self.average_per_day));

        for row in &self.rows {
            output.push_str(&format!(
                "{}: {:.1} kg, {} animals, {:.2} kg per animal\n",
                row.label, row.quantity, row.avg_animal_count, row.per_animal
            ));
        }

        output
    }

    /// Standalone printable HTML document
    pub fn to_html(&self) -> String {
        let mut rows = String::new();
        for row in &self.rows {
            rows.push_str(&format!(
                "      <tr><td>{}</td><td>{:.1}</td><td>{}</td><td>{:.2}</td></tr>\n",
                escape_html(&row.label),
                row.quantity,
                row.avg_animal_count,
                row.per_animal
            ));
        }

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Milk Production Report</title>
  <style>
    body {{ font-family: Arial, sans-serif; }}
    h3 {{ color: #166088; }}
    .report-stats {{ margin: 20px 0; }}
    .report-stat-item {{ margin-bottom: 10px; }}
    table {{ width: 100%; border-collapse: collapse; }}
    th, td {{ padding: 8px; text-align: left; border-bottom: 1px solid #ddd; }}
    th {{ background-color: #f2f2f2; }}
  </style>
</head>
<body>
  <h3>Milk Production Report</h3>
  <p>Period: {period}</p>
  <div class="report-stats">
    <div class="report-stat-item"><span>Total Milk:</span> <span>{total:.1} kg</span></div>
    <div class="report-stat-item"><span>Average per Day:</span> <span>{average:.1} kg</span></div>
  </div>
  <table class="report-table">
    <thead>
      <tr><th>{heading}</th><th>Quantity (kg)</th><th>Animals</th><th>Per Animal (kg)</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>
</body>
</html>
"#,
            period = escape_html(&self.period()),
            total = self.total_quantity,
            average = self.average_per_day,
            heading = self.granularity.column_heading(),
            rows = rows,
        )
    }

    /// Export the rows to CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> MilkResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer
            .write_record([
                self.granularity.column_heading(),
                "Quantity (kg)",
                "Animals",
                "Per Animal (kg)",
                "Entries",
            ])
            .map_err(|e| MilkError::Export(e.to_string()))?;

        for row in &self.rows {
            csv_writer
                .write_record([
                    row.label.clone(),
                    format!("{:.1}", row.quantity),
                    row.avg_animal_count.to_string(),
                    format!("{:.2}", row.per_animal),
                    row.entries.to_string(),
                ])
                .map_err(|e| MilkError::Export(e.to_string()))?;
        }

        csv_writer
            .flush()
            .map_err(|e| MilkError::Export(e.to_string()))?;
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEntry;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn entry(quantity: f64, animals: u32, date: NaiveDateTime) -> Entry {
        Entry::create(NewEntry::new(quantity, date).with_animals(animals)).unwrap()
    }

    fn sample_entries() -> Vec<Entry> {
        // newest first, as stored
        vec![
            entry(8.0, 2, ts(2024, 1, 3, 6)),
            entry(20.0, 2, ts(2024, 1, 1, 18)),
            entry(10.0, 2, ts(2024, 1, 1, 6)),
        ]
    }

    fn generate(granularity: Granularity) -> ProductionReport {
        let outcome = ProductionReport::generate(
            &sample_entries(),
            ts(2024, 1, 1, 0),
            ts(2024, 1, 10, 0),
            granularity,
        )
        .unwrap();
        outcome.report().cloned().unwrap()
    }

    #[test]
    fn test_generate_daily_report() {
        let report = generate(Granularity::Daily);

        assert_eq!(report.total_quantity, 38.0);
        assert_eq!(report.days_in_range, 10);
        assert!((report.average_per_day - 3.8).abs() < 1e-9);
        assert_eq!(report.entry_count, 3);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].label, "3/1/2024");
        assert_eq!(report.rows[1].label, "1/1/2024");
        assert_eq!(report.rows[1].quantity, 30.0);
        assert_eq!(report.rows[1].avg_animal_count, 2);
        assert_eq!(report.rows[1].per_animal, 7.5);
    }

    #[test]
    fn test_generate_monthly_report() {
        let report = generate(Granularity::Monthly);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].label, "January 2024");
        assert_eq!(report.rows[0].entries, 3);
    }

    #[test]
    fn test_start_after_end_is_invalid_range() {
        let err = ProductionReport::generate(
            &sample_entries(),
            ts(2024, 3, 1, 0),
            ts(2024, 2, 1, 0),
            Granularity::Daily,
        )
        .unwrap_err();
        assert!(err.is_invalid_range());
    }

    #[test]
    fn test_empty_range_outcome() {
        let outcome = ProductionReport::generate(
            &sample_entries(),
            ts(2023, 6, 1, 0),
            ts(2023, 6, 30, 0),
            Granularity::Weekly,
        )
        .unwrap();

        assert!(outcome.report().is_none());
        assert_eq!(
            outcome.format_terminal(),
            "No entries found between 1/6/2023 and 30/6/2023.\n"
        );
    }

    #[test]
    fn test_format_terminal() {
        let output = generate(Granularity::Daily).format_terminal();
        assert!(output.contains("Milk Production Report (daily): 1/1/2024 to 10/1/2024"));
        assert!(output.contains("Total Milk: 38.0 kg"));
        assert!(output.contains("Average per Day: 3.8 kg (10 days)"));
        assert!(output.contains("7.50"));
    }

    #[test]
    fn test_text_export() {
        let text = generate(Granularity::Daily).to_text();
        assert!(text.starts_with("Milk Production Report\n"));
        assert!(text.contains("1/1/2024: 30.0 kg, 2 animals, 7.50 kg per animal"));
    }

    #[test]
    fn test_html_export() {
        let html = generate(Granularity::Monthly).to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<th>Month</th>"));
        assert!(html.contains("<td>January 2024</td><td>38.0</td><td>2</td><td>6.33</td>"));
    }

    #[test]
    fn test_csv_export_quotes_labels() {
        let report = generate(Granularity::Weekly);
        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();

        let csv_string = String::from_utf8(buffer).unwrap();
        let mut lines = csv_string.lines();
        assert_eq!(
            lines.next(),
            Some("Week,Quantity (kg),Animals,Per Animal (kg),Entries")
        );
        assert!(lines.next().unwrap().starts_with("\"Week 1, 2024\","));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a & b>"), "&lt;a &amp; b&gt;");
    }
}
