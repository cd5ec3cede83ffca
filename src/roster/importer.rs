//! Roster importer implementation - Excel (.xlsx/.xls) → student records

use crate::error::{RosterError, RosterResult};
use crate::roster::dates;
use crate::types::{
    ImportReport, ImportWarning, StudentRecord, WarningKind, ACCESS_LEVEL_STUDENT, DEFAULT_STATUS,
};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// Fixed column layout: A-F, header in row 1.
const COL_STUDENT_NUMBER: usize = 0;
const COL_NAME: usize = 1;
const COL_BIRTH_DATE: usize = 2;
const COL_DEPARTMENT: usize = 3;
const COL_GRADE: usize = 4;
const COL_STATUS: usize = 5;

/// Roster importer for converting Excel student rosters to validated records
pub struct RosterImporter {
    path: PathBuf,
}

impl RosterImporter {
    /// Create a new roster importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Run one import pass over the first sheet of the workbook.
    ///
    /// Fatal errors (unsupported extension, unreadable workbook) abort the
    /// call with no partial output. Row-level problems skip the row and are
    /// returned as warnings in the report.
    pub fn import(&self) -> RosterResult<ImportReport> {
        self.check_extension()?;

        // The workbook handle lives for this call only; it is dropped on
        // every exit path below.
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| RosterError::FileAccess(format!("{}: {}", self.path.display(), e)))?;

        let sheet_name = workbook.sheet_names().first().cloned().ok_or_else(|| {
            RosterError::FileAccess(format!("{}: workbook has no sheets", self.path.display()))
        })?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| RosterError::FileAccess(format!("sheet '{}': {}", sheet_name, e)))?;

        let mut report = ImportReport::default();

        // Row 1 is unconditionally a header.
        for (index, row) in range.rows().enumerate().skip(1) {
            let row_number = (index + 1) as u32;
            if let Some(record) = parse_row(row, row_number, &mut report.warnings) {
                report.records.push(record);
            }
        }

        debug!(
            accepted = report.records.len(),
            warnings = report.warnings.len(),
            "roster import finished"
        );
        Ok(report)
    }

    /// Reject anything that is not an Excel workbook before any I/O happens.
    fn check_extension(&self) -> RosterResult<()> {
        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xls" => Ok(()),
            _ => Err(RosterError::UnsupportedFormat(
                self.path.display().to_string(),
            )),
        }
    }
}

/// Validate one data row. Returns the record, or `None` after recording a
/// warning when the row must be skipped. Coercion warnings (bad grade) are
/// recorded without rejecting the row.
fn parse_row(
    row: &[Data],
    row_number: u32,
    warnings: &mut Vec<ImportWarning>,
) -> Option<StudentRecord> {
    let student_number = match cell_text(row.get(COL_STUDENT_NUMBER)) {
        Ok(text) => text,
        Err(cell_error) => {
            push_warning(
                warnings,
                ImportWarning::new(
                    row_number,
                    None,
                    WarningKind::RowError,
                    format!("error cell in student number column: {}", cell_error),
                ),
            );
            return None;
        }
    };
    if student_number.is_empty() {
        push_warning(
            warnings,
            ImportWarning::new(
                row_number,
                None,
                WarningKind::MissingStudentNumber,
                "student number column is empty".to_string(),
            ),
        );
        return None;
    }

    let name = match cell_text(row.get(COL_NAME)) {
        Ok(text) => text,
        Err(cell_error) => {
            push_warning(
                warnings,
                ImportWarning::new(
                    row_number,
                    Some(student_number),
                    WarningKind::RowError,
                    format!("error cell in name column: {}", cell_error),
                ),
            );
            return None;
        }
    };
    if name.is_empty() {
        push_warning(
            warnings,
            ImportWarning::new(
                row_number,
                Some(student_number),
                WarningKind::MissingName,
                "name column is empty".to_string(),
            ),
        );
        return None;
    }

    // Birth date is required: it seeds the student's initial password.
    let birth_date = match birth_date_cell(row.get(COL_BIRTH_DATE)) {
        Some(date) => date,
        None => {
            push_warning(
                warnings,
                ImportWarning::new(
                    row_number,
                    Some(student_number),
                    WarningKind::UnparseableBirthDate,
                    "birth date is missing or not in a supported format".to_string(),
                ),
            );
            return None;
        }
    };

    let department = cell_text(row.get(COL_DEPARTMENT)).unwrap_or_default();

    let grade = match parse_grade(row.get(COL_GRADE)) {
        Ok(grade) => grade,
        Err(raw) => {
            // Guarded fallback: the row is still accepted with grade 0.
            push_warning(
                warnings,
                ImportWarning::new(
                    row_number,
                    Some(student_number.clone()),
                    WarningKind::UnparseableGrade,
                    format!("grade '{}' is not a number, defaulting to 0", raw),
                ),
            );
            0
        }
    };

    let status = match cell_text(row.get(COL_STATUS)) {
        Ok(text) if !text.is_empty() => text,
        _ => DEFAULT_STATUS.to_string(),
    };

    Some(StudentRecord {
        student_number,
        name,
        birth_date,
        department,
        grade,
        status,
        access_level: ACCESS_LEVEL_STUDENT,
    })
}

fn push_warning(warnings: &mut Vec<ImportWarning>, warning: ImportWarning) {
    warn!(row = warning.row, kind = %warning.kind, "{}", warning.message);
    warnings.push(warning);
}

/// Display-formatted text of a cell, trimmed.
///
/// Excel error cells (`#VALUE!` and friends) surface as `Err` so required
/// columns can reject the row instead of silently importing garbage.
fn cell_text(cell: Option<&Data>) -> Result<String, String> {
    match cell {
        None | Some(Data::Empty) => Ok(String::new()),
        Some(Data::String(s)) => Ok(s.trim().to_string()),
        Some(Data::Float(f)) => {
            // Identifiers like student numbers come back as floats
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Ok((*f as i64).to_string())
            } else {
                Ok(f.to_string())
            }
        }
        Some(Data::Int(i)) => Ok(i.to_string()),
        Some(Data::Bool(b)) => Ok(b.to_string()),
        Some(Data::DateTime(dt)) => Ok(dt.to_string()),
        Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => Ok(s.trim().to_string()),
        Some(Data::Error(e)) => Err(format!("{:?}", e)),
    }
}

/// Resolve the birth-date column by underlying cell type.
///
/// Only two shapes count as dates: a numeric cell carrying a date format
/// (calamine yields `Data::DateTime` for those) and a string matching the
/// supported format chain. A plain numeric cell is not a date, whatever its
/// value.
fn birth_date_cell(cell: Option<&Data>) -> Option<NaiveDate> {
    match cell {
        Some(Data::DateTime(dt)) => dt.as_datetime().map(|dt| dt.date()),
        Some(Data::String(s)) => dates::parse_birth_date(s.trim()),
        _ => None,
    }
}

/// Grade column: strip everything that is not a digit, then parse.
///
/// A stripped-empty cell (blank, or text with no digits at all) defaults to
/// 0 silently. `Err` carries the original text for the warning message and
/// only fires when a parse was attempted and failed, e.g. a digit run
/// exceeding the integer range.
fn parse_grade(cell: Option<&Data>) -> Result<u32, String> {
    let text = cell_text(cell).unwrap_or_default();
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Ok(0);
    }
    digits.parse::<u32>().map_err(|_| text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn cell_text_formats_integral_floats_without_decimals() {
        assert_eq!(
            cell_text(Some(&Data::Float(20250123.0))).unwrap(),
            "20250123"
        );
        assert_eq!(cell_text(Some(&Data::Float(2.5))).unwrap(), "2.5");
        assert_eq!(cell_text(Some(&Data::Int(7))).unwrap(), "7");
    }

    #[test]
    fn cell_text_trims_strings_and_defaults_blanks() {
        assert_eq!(cell_text(Some(&Data::String("  Kim  ".into()))).unwrap(), "Kim");
        assert_eq!(cell_text(Some(&Data::Empty)).unwrap(), "");
        assert_eq!(cell_text(None).unwrap(), "");
    }

    #[test]
    fn cell_text_rejects_error_cells() {
        assert!(cell_text(Some(&Data::Error(CellErrorType::Value))).is_err());
    }

    #[test]
    fn birth_date_accepts_date_formatted_numeric_cells() {
        // Excel serial for 2003-11-20 in the 1900 date system
        let cell = Data::DateTime(ExcelDateTime::new(
            37945.0,
            ExcelDateTimeType::DateTime,
            false,
        ));
        assert_eq!(
            birth_date_cell(Some(&cell)),
            NaiveDate::from_ymd_opt(2003, 11, 20)
        );
    }

    #[test]
    fn birth_date_rejects_plain_numeric_cells() {
        // Same serial value, but the cell is not date-formatted
        assert_eq!(birth_date_cell(Some(&Data::Float(37945.0))), None);
        assert_eq!(birth_date_cell(Some(&Data::Int(37945))), None);
        assert_eq!(birth_date_cell(Some(&Data::Bool(true))), None);
        assert_eq!(birth_date_cell(Some(&Data::Empty)), None);
        assert_eq!(birth_date_cell(None), None);
    }

    #[test]
    fn birth_date_parses_string_cells_through_the_chain() {
        let expected = NaiveDate::from_ymd_opt(2004, 3, 5);
        let cell = Data::String("2004.03.05".to_string());
        assert_eq!(birth_date_cell(Some(&cell)), expected);
    }

    #[test]
    fn grade_strips_suffixes_and_defaults_to_zero() {
        assert_eq!(parse_grade(Some(&Data::String("2학년".into()))), Ok(2));
        assert_eq!(parse_grade(Some(&Data::String("3".into()))), Ok(3));
        assert_eq!(parse_grade(Some(&Data::Float(1.0))), Ok(1));
        // No digits at all is a silent default, not a warning
        assert_eq!(parse_grade(Some(&Data::String("abc".into()))), Ok(0));
        assert_eq!(parse_grade(Some(&Data::Empty)), Ok(0));
        assert_eq!(parse_grade(None), Ok(0));
    }

    #[test]
    fn grade_overflow_is_a_guarded_failure() {
        let huge = Data::String("99999999999999999999".to_string());
        assert!(parse_grade(Some(&huge)).is_err());
    }

    #[test]
    fn unsupported_extension_fails_before_any_io() {
        // The path does not exist; the extension gate must fire first
        let importer = RosterImporter::new("does-not-exist/roster.csv");
        match importer.import() {
            Err(RosterError::UnsupportedFormat(path)) => {
                assert!(path.ends_with("roster.csv"));
            }
            other => panic!("expected UnsupportedFormat, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_file_is_a_file_access_error() {
        let importer = RosterImporter::new("does-not-exist/roster.xlsx");
        assert!(matches!(
            importer.import(),
            Err(RosterError::FileAccess(_))
        ));
    }

    #[test]
    fn parse_row_reports_missing_required_fields() {
        let mut warnings = Vec::new();

        let blank_number = vec![Data::Empty, Data::String("Kim".into())];
        assert!(parse_row(&blank_number, 2, &mut warnings).is_none());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::MissingStudentNumber);
        assert_eq!(warnings[0].row, 2);
        assert_eq!(warnings[0].student_number, None);

        let blank_name = vec![Data::String("20250101".into()), Data::Empty];
        assert!(parse_row(&blank_name, 3, &mut warnings).is_none());
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[1].kind, WarningKind::MissingName);
        assert_eq!(warnings[1].student_number.as_deref(), Some("20250101"));
    }

    #[test]
    fn parse_row_accepts_short_rows_with_defaults() {
        let mut warnings = Vec::new();
        let row = vec![
            Data::String("20250101".into()),
            Data::String("Kim".into()),
            Data::String("2004-03-05".into()),
        ];

        let record = parse_row(&row, 2, &mut warnings).expect("row should be accepted");
        assert!(warnings.is_empty());
        assert_eq!(record.department, "");
        assert_eq!(record.grade, 0);
        assert_eq!(record.status, DEFAULT_STATUS);
        assert_eq!(record.access_level, ACCESS_LEVEL_STUDENT);
    }
}
