use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use milk_ledger::audit::AuditLogger;
use milk_ledger::cli::{
    handle_backup_command, handle_entry_command, handle_finance_command, handle_report_command,
    BackupCommands, EntryCommands, FinanceCommands, ReportArgs,
};
use milk_ledger::config::paths::{MilkPaths, DATA_DIR_ENV};
use milk_ledger::services::Session;
use milk_ledger::storage::JsonFileStore;

#[derive(Parser)]
#[command(
    name = "milk",
    version,
    about = "Milk production tracker",
    long_about = "milk-ledger records milk measurements per milking, computes totals, \
                  per-animal averages and revenue, and produces daily, weekly or \
                  monthly production reports."
)]
struct Cli {
    /// Directory holding the data file, backups and audit log
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Entry(EntryCommands),

    #[command(flatten)]
    Finance(FinanceCommands),

    /// Production report for a date range
    Report(ReportArgs),

    /// Backup and restore commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Show recent changes from the audit log
    History {
        /// Number of changes to show
        #[arg(short = 'n', long, default_value_t = 20)]
        count: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("MILK_LOG").unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => MilkPaths::with_base_dir(dir),
        None => MilkPaths::new()?,
    };
    paths.ensure_directories()?;

    let mut session = Session::open(JsonFileStore::new(paths.state_file()))
        .with_audit(AuditLogger::new(paths.audit_log()));

    if let Some(err) = session.load_error() {
        eprintln!("Warning: saved data could not be loaded; starting with no entries.");
        eprintln!("  {}", err);
    }
    let skipped = session.skipped_on_load();
    if !skipped.is_empty() {
        eprintln!(
            "Warning: {} stored item(s) could not be read and were skipped:",
            skipped.len()
        );
        for problem in skipped {
            eprintln!("  {}", problem);
        }
    }

    match cli.command {
        Some(Commands::Entry(cmd)) => handle_entry_command(&mut session, cmd)?,
        Some(Commands::Finance(cmd)) => handle_finance_command(&mut session, cmd)?,
        Some(Commands::Report(args)) => handle_report_command(&session, args)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&paths, &mut session, cmd)?,
        Some(Commands::History { count }) => {
            let entries = AuditLogger::new(paths.audit_log()).read_recent(count)?;
            if entries.is_empty() {
                println!("No changes recorded yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Config) => {
            let settings = session.settings();
            println!("milk-ledger Configuration");
            println!("=========================");
            println!("Data directory:   {}", paths.base_dir().display());
            println!("Data file:        {}", paths.state_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Milk price:         {}", settings.milk_price);
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Recent list limit:  {}", settings.recent_limit);
            println!("  Backups kept:       {}", settings.backup_keep);
            println!("  Cloud backup:       {}", settings.cloud_backup_enabled);
            match settings.last_backup_date {
                Some(at) => println!("  Last cloud backup:  {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
                None => println!("  Last cloud backup:  never"),
            }
        }
        None => {
            println!("milk-ledger - milk production tracker");
            println!();
            println!("Run 'milk --help' for usage information.");
            println!("Run 'milk add <KG>' to record a measurement.");
        }
    }

    if let Some(location) = session.set_aside_location() {
        eprintln!("The unreadable data file was kept as {}", location);
    }

    Ok(())
}
