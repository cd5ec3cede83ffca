use cbt_roster::cli;
use cbt_roster::error::RosterResult;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Import CBT student rosters from Excel into validated records.")]
#[command(long_about = "Roster - CBT student roster importer

Reads the first sheet of an .xlsx/.xls workbook (columns A-F: student number,
name, birth date, department, grade, status; row 1 is the header), validates
every row, and reports skipped rows with reasons instead of aborting.

COMMANDS:
  import - Import a roster, optionally writing records and hashed credentials
  check  - Validate a roster without writing anything

EXAMPLES:
  roster import students.xlsx
  roster import students.xlsx --out records.json --credentials creds.json
  roster check students.xlsx")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a roster workbook
    Import {
        /// Path to the roster workbook (.xlsx or .xls)
        file: PathBuf,

        /// Write accepted records as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write hashed initial credentials as JSON
        #[arg(long)]
        credentials: Option<PathBuf>,

        /// Print every accepted record
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a roster workbook without importing
    Check {
        /// Path to the roster workbook (.xlsx or .xls)
        file: PathBuf,
    },
}

fn main() -> RosterResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cbt_roster=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            file,
            out,
            credentials,
            verbose,
        } => cli::import(file, out, credentials, verbose),

        Commands::Check { file } => cli::check(file),
    }
}
