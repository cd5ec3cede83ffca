//! Roster import module
//!
//! Reads the first sheet of an Excel workbook, skips the header row, and
//! turns each data row into at most one [`crate::types::StudentRecord`].
//! Row-level problems become warnings in the returned report; only
//! file-level failures abort the call.

mod dates;
mod importer;

pub use importer::RosterImporter;
