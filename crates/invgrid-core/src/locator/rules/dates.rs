//! Date handling for template cells.
//!
//! Only the lexical shape is checked: a cell starting with `YYYY-MM-DD` is a
//! date candidate, whatever the calendar says about it.

use super::patterns::ISO_DATE_PREFIX;

/// Whether the cell starts with an ISO-style date.
pub fn is_iso_date(s: &str) -> bool {
    ISO_DATE_PREFIX.is_match(s.trim())
}

/// Date portion of an ISO-style cell, dropping any trailing time component.
pub fn iso_date_part(s: &str) -> Option<String> {
    ISO_DATE_PREFIX
        .captures(s.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_part_strips_time() {
        assert_eq!(
            iso_date_part("2024-07-01 00:00:00"),
            Some("2024-07-01".to_string())
        );
        assert_eq!(iso_date_part("2024-07-01"), Some("2024-07-01".to_string()));
        assert_eq!(
            iso_date_part("2024-07-01T10:30:00"),
            Some("2024-07-01".to_string())
        );
    }

    #[test]
    fn test_iso_date_requires_prefix() {
        assert!(!is_iso_date("Date: 2024-07-01"));
        assert!(!is_iso_date("01-07-2024"));
        assert!(!is_iso_date("24-07-01"));
        assert_eq!(iso_date_part("SSH/24-25/101"), None);
    }

    #[test]
    fn test_calendar_is_not_checked() {
        assert!(is_iso_date("2024-13-45"));
    }
}
