//! Report CLI command
//!
//! Prints a production report and optionally writes it to text, HTML
//! (for printing) or CSV files.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use clap::Args;

use crate::error::{MilkError, MilkResult};
use crate::models::input::parse_date;
use crate::models::Granularity;
use crate::reports::ReportOutcome;
use crate::services::Session;
use crate::storage::StateStore;

/// Report arguments
#[derive(Args)]
pub struct ReportArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: String,

    /// End date (YYYY-MM-DD); the whole day is included
    #[arg(short, long)]
    pub end: String,

    /// Grouping: daily, weekly or monthly
    #[arg(short, long, default_value = "daily")]
    pub granularity: Granularity,

    /// Order rows oldest first instead of newest first
    #[arg(long)]
    pub chronological: bool,

    /// Also write the report as plain text
    #[arg(long)]
    pub text: Option<PathBuf>,

    /// Also write the report as a printable HTML document
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Also write the rows as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Handle the report command
pub fn handle_report_command<S: StateStore>(
    session: &Session<S>,
    args: ReportArgs,
) -> MilkResult<()> {
    let start = parse_date(&args.start)?.and_time(NaiveTime::MIN);
    let end = parse_date(&args.end)?.and_time(NaiveTime::MIN);

    let outcome = session.generate_report(start, end, args.granularity, args.chronological)?;
    print!("{}", outcome.format_terminal());

    let ReportOutcome::Report(report) = outcome else {
        return Ok(());
    };

    if let Some(path) = &args.text {
        write_file(path, &report.to_text())?;
        println!("Text report written to {}", path.display());
    }

    if let Some(path) = &args.html {
        write_file(path, &report.to_html())?;
        println!("Printable report written to {}", path.display());
    }

    if let Some(path) = &args.csv {
        let file = File::create(path).map_err(|e| {
            MilkError::Export(format!("Failed to create {}: {}", path.display(), e))
        })?;
        report.export_csv(BufWriter::new(file))?;
        println!("CSV report written to {}", path.display());
    }

    Ok(())
}

fn write_file(path: &Path, contents: &str) -> MilkResult<()> {
    std::fs::write(path, contents)
        .map_err(|e| MilkError::Export(format!("Failed to write {}: {}", path.display(), e)))
}
