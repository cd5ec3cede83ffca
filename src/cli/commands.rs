use crate::credential;
use crate::error::{RosterError, RosterResult};
use crate::roster::RosterImporter;
use crate::types::ImportReport;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

/// Execute the import command
pub fn import(
    file: PathBuf,
    out: Option<PathBuf>,
    credentials: Option<PathBuf>,
    verbose: bool,
) -> RosterResult<()> {
    println!("{}", "📋 Roster - Importing students".bold().green());
    println!("   File: {}\n", file.display());

    let importer = RosterImporter::new(&file);
    let report = importer.import()?;

    print_report(&report, verbose);

    if let Some(out) = out {
        let json = serde_json::to_string_pretty(&report.records)?;
        fs::write(&out, json)?;
        println!("   Records written to {}", out.display());
    }

    if let Some(credentials_path) = credentials {
        // Seeds are hashed before they touch disk; plaintext never leaves
        // memory.
        let seeded = credential::seed_roster(&report.records)?;
        let json = serde_json::to_string_pretty(&seeded)?;
        fs::write(&credentials_path, json)?;
        println!(
            "   Initial credentials ({} hashed) written to {}",
            seeded.len(),
            credentials_path.display()
        );
    }

    println!("\n{}", "✅ Import complete!".bold().green());
    Ok(())
}

/// Execute the check command: parse-only validation, no output files.
/// Fails when any row had to be skipped so scripts can gate on the exit code.
pub fn check(file: PathBuf) -> RosterResult<()> {
    println!("{}", "🔍 Roster - Checking file".bold().green());
    println!("   File: {}\n", file.display());

    let importer = RosterImporter::new(&file);
    let report = importer.import()?;

    print_report(&report, false);

    let skipped = report.skipped_rows();
    if skipped == 0 {
        println!("\n{}", "✅ All rows valid!".bold().green());
        Ok(())
    } else {
        println!(
            "\n{}",
            format!("❌ {} row(s) would be skipped", skipped).bold().red()
        );
        Err(RosterError::Validation(format!(
            "{} of {} data rows failed validation",
            skipped,
            skipped + report.records.len()
        )))
    }
}

fn print_report(report: &ImportReport, verbose: bool) {
    println!(
        "   Accepted {} student(s), {} warning(s)",
        report.records.len(),
        report.warnings.len()
    );

    if verbose {
        for record in &report.records {
            println!(
                "   {} {} ({}, grade {}, {})",
                record.student_number.bright_blue(),
                record.name,
                record.birth_date,
                record.grade,
                record.status
            );
        }
    }

    if !report.warnings.is_empty() {
        println!("\n{}", "⚠️  Skipped or coerced rows:".yellow());
        for warning in &report.warnings {
            println!("   {}", warning.to_string().yellow());
        }
    }
}
