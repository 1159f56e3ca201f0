//! Amount parsing for spreadsheet totals.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::AMOUNT_LEXEME;

/// Parse a cell as an amount, dropping `,` thousands separators.
///
/// The text must look like a number from its first character: `"12,345.50"`
/// parses, `"Rs. 100"`, `"-5"` and `"abc"` do not. Exponent forms and values
/// too wide for a `Decimal` are not amounts either.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if !AMOUNT_LEXEME.is_match(s) {
        return None;
    }

    let cleaned = s.replace(',', "");
    let cleaned = cleaned.trim_end_matches('.');
    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(cleaned).ok()
}

/// Parse an amount and require it to exceed `threshold`.
pub fn parse_amount_above(s: &str, threshold: Decimal) -> Option<Decimal> {
    parse_amount(s).filter(|amount| *amount > threshold)
}

/// Default noise threshold for totals; smaller numbers are row numbers,
/// quantities and the like.
pub fn noise_threshold() -> Decimal {
    Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_separators() {
        assert_eq!(
            parse_amount("12,345.50"),
            Some(Decimal::from_str("12345.50").unwrap())
        );
        assert_eq!(parse_amount("12,345.50"), parse_amount("12345.50"));
        assert_eq!(parse_amount("1,00,000"), Some(Decimal::from(100000)));
        assert_eq!(parse_amount("  450  "), Some(Decimal::from(450)));
        assert_eq!(parse_amount("12."), Some(Decimal::from(12)));
    }

    #[test]
    fn test_parse_amount_rejects_non_numbers() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(","), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount("Rs. 100"), None);
        assert_eq!(parse_amount("100 INR"), None);
        assert_eq!(parse_amount("SSH/24-25/101"), None);
    }

    #[test]
    fn test_parse_amount_plain_decimal_only() {
        assert_eq!(parse_amount("1e5"), None);
        assert_eq!(parse_amount("1E+05"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount(&"9".repeat(40)), None);
        assert_eq!(
            parse_amount(&"9".repeat(28)),
            Some(Decimal::from_str(&"9".repeat(28)).unwrap())
        );
    }

    #[test]
    fn test_parse_amount_above() {
        let threshold = noise_threshold();
        assert_eq!(parse_amount_above("100", threshold), None);
        assert_eq!(parse_amount_above("100.01", threshold), Some(Decimal::from_str("100.01").unwrap()));
        assert_eq!(parse_amount_above("7", threshold), None);
    }
}
