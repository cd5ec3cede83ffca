//! Birth-date parsing strategies for string cells.

use chrono::NaiveDate;

/// Accepted string formats, tried in order; the first match wins.
const BIRTH_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];

/// Parse a trimmed birth-date string against the ordered format chain.
pub(crate) fn parse_birth_date(text: &str) -> Option<NaiveDate> {
    BIRTH_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_each_format_in_the_chain() {
        let expected = NaiveDate::from_ymd_opt(2004, 3, 5).unwrap();
        assert_eq!(parse_birth_date("2004-03-05"), Some(expected));
        assert_eq!(parse_birth_date("2004.03.05"), Some(expected));
        assert_eq!(parse_birth_date("2004/03/05"), Some(expected));
    }

    #[test]
    fn rejects_day_first_ordering() {
        assert_eq!(parse_birth_date("03-05-2004"), None);
    }

    #[test]
    fn rejects_junk_and_empty_input() {
        assert_eq!(parse_birth_date(""), None);
        assert_eq!(parse_birth_date("not a date"), None);
        assert_eq!(parse_birth_date("2004-13-40"), None);
    }
}
