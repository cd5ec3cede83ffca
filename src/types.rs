use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access level assigned to every imported student.
pub const ACCESS_LEVEL_STUDENT: u8 = 1;

/// Enrollment status used when the status column is blank.
pub const DEFAULT_STATUS: &str = "active";

//==============================================================================
// Student Records
//==============================================================================

/// One accepted roster row.
///
/// Records are immutable after construction: a row either produces exactly
/// one fully-populated record or is skipped with a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Unique student identifier (uniqueness enforced downstream).
    pub student_number: String,
    pub name: String,
    /// Required; seeds the student's initial password.
    pub birth_date: NaiveDate,
    /// Optional, empty when the column is blank.
    pub department: String,
    /// Optional; non-numeric input coerces to 0.
    pub grade: u32,
    /// Free-form enrollment status, no enumeration is enforced.
    pub status: String,
    pub access_level: u8,
}

//==============================================================================
// Row Diagnostics
//==============================================================================

/// Category of a non-fatal row diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    MissingStudentNumber,
    MissingName,
    UnparseableBirthDate,
    UnparseableGrade,
    /// Unexpected cell-level failure (e.g. an Excel error cell in a
    /// required column); the row is skipped and the pass continues.
    RowError,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WarningKind::MissingStudentNumber => "missing student number",
            WarningKind::MissingName => "missing name",
            WarningKind::UnparseableBirthDate => "unparseable birth date",
            WarningKind::UnparseableGrade => "unparseable grade",
            WarningKind::RowError => "row processing error",
        };
        write!(f, "{}", label)
    }
}

/// A non-fatal diagnostic about one input row.
///
/// Warnings are returned as data alongside the accepted records; they are
/// never raised across the import call boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportWarning {
    /// 1-based physical row (the header is row 1).
    pub row: u32,
    /// Student number when it was readable before the row failed.
    pub student_number: Option<String>,
    pub kind: WarningKind,
    pub message: String,
}

impl ImportWarning {
    pub fn new(row: u32, student_number: Option<String>, kind: WarningKind, message: String) -> Self {
        Self {
            row,
            student_number,
            kind,
            message,
        }
    }
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.student_number {
            Some(number) => write!(f, "row {} ({}): {}", self.row, number, self.message),
            None => write!(f, "row {}: {}", self.row, self.message),
        }
    }
}

//==============================================================================
// Import Report
//==============================================================================

/// Outcome of one import pass: accepted records plus ordered warnings.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Accepted records, in input row order.
    pub records: Vec<StudentRecord>,
    /// Diagnostics for skipped or partially-coerced rows, in emission order.
    pub warnings: Vec<ImportWarning>,
}

impl ImportReport {
    /// True when every data row produced a record without coercion warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Number of rows that were skipped outright (coercion warnings such as
    /// a bad grade still yield a record and are not counted here).
    pub fn skipped_rows(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.kind != WarningKind::UnparseableGrade)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_display_includes_student_number_when_known() {
        let with_number = ImportWarning::new(
            4,
            Some("20250101".to_string()),
            WarningKind::MissingName,
            "name column is empty".to_string(),
        );
        assert_eq!(
            with_number.to_string(),
            "row 4 (20250101): name column is empty"
        );

        let without_number = ImportWarning::new(
            2,
            None,
            WarningKind::MissingStudentNumber,
            "student number column is empty".to_string(),
        );
        assert_eq!(
            without_number.to_string(),
            "row 2: student number column is empty"
        );
    }

    #[test]
    fn skipped_rows_excludes_grade_coercions() {
        let report = ImportReport {
            records: Vec::new(),
            warnings: vec![
                ImportWarning::new(2, None, WarningKind::MissingStudentNumber, "x".into()),
                ImportWarning::new(
                    3,
                    Some("1".into()),
                    WarningKind::UnparseableGrade,
                    "y".into(),
                ),
            ],
        };
        assert_eq!(report.skipped_rows(), 1);
        assert!(!report.is_clean());
    }
}
