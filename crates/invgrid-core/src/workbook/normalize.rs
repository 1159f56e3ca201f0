//! Cell value to text conversion.

use calamine::Data;
use chrono::NaiveDateTime;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ISO_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Render a cell as the text the locator sees.
pub fn cell_text(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => ndt.format(DATETIME_FORMAT).to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) => match NaiveDateTime::parse_from_str(s, ISO_DATETIME_FORMAT) {
            Ok(ndt) => ndt.format(DATETIME_FORMAT).to_string(),
            Err(_) => s.replacen('T', " ", 1),
        },
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_numbers() {
        assert_eq!(cell_text(&Data::Float(1500.0)), "1500");
        assert_eq!(cell_text(&Data::Float(12345.5)), "12345.5");
        assert_eq!(cell_text(&Data::Int(42)), "42");
    }

    #[test]
    fn test_empty_and_strings() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("VC-102".to_string())), "VC-102");
        assert_eq!(cell_text(&Data::Bool(true)), "TRUE");
    }

    #[test]
    fn test_iso_datetime_keeps_date_prefix() {
        let text = cell_text(&Data::DateTimeIso("2024-07-01T00:00:00".to_string()));
        assert_eq!(text, "2024-07-01 00:00:00");

        let text = cell_text(&Data::DateTimeIso("2024-07-01T10:30:00.250".to_string()));
        assert_eq!(text, "2024-07-01 10:30:00");

        let text = cell_text(&Data::DateTimeIso("2024-07-01".to_string()));
        assert_eq!(text, "2024-07-01");
    }

    #[test]
    fn test_error_literal() {
        assert_eq!(cell_text(&Data::Error(CellErrorType::Div0)), "#DIV/0!");
    }
}
