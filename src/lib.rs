//! CBT Roster - Excel student roster importer for CBT administration
//!
//! This library reads student rosters from Excel workbooks (.xlsx/.xls),
//! validates and normalizes each row into an immutable [`StudentRecord`],
//! and reports per-row problems as structured warnings instead of errors.
//!
//! # Features
//!
//! - Row-by-row validation with typed, non-fatal warnings
//! - Birth-date resolution from date-formatted cells and common string formats
//! - Initial password seeding from birth dates
//! - PBKDF2-HMAC-SHA256 hashing for seeded credentials
//!
//! # Example
//!
//! ```no_run
//! use cbt_roster::roster::RosterImporter;
//!
//! let importer = RosterImporter::new("roster.xlsx");
//! let report = importer.import()?;
//!
//! println!("Accepted: {}", report.records.len());
//! for warning in &report.warnings {
//!     println!("Skipped row {}: {}", warning.row, warning.message);
//! }
//! # Ok::<(), cbt_roster::error::RosterError>(())
//! ```

pub mod cli;
pub mod credential;
pub mod error;
pub mod roster;
pub mod types;

// Re-export commonly used types
pub use error::{RosterError, RosterResult};
pub use roster::RosterImporter;
pub use types::{ImportReport, ImportWarning, StudentRecord, WarningKind};
