//! Common regex patterns for spreadsheet invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date at the start of a cell, optionally followed by a time component
    pub static ref ISO_DATE_PREFIX: Regex = Regex::new(
        r"^(\d{4}-\d{2}-\d{2})"
    ).unwrap();

    // Plain or thousands-separated number, e.g. "12,345.50"
    pub static ref AMOUNT_LEXEME: Regex = Regex::new(
        r"^[\d,]+(?:\.\d*)?$"
    ).unwrap();

    // Invoice series number, e.g. "SSH/24-25/101"
    pub static ref INVOICE_SERIES: Regex = Regex::new(
        r"SSH[-/]\S+"
    ).unwrap();

    // Label followed by a colon, e.g. "Name  :" or "GSTIN :"
    pub static ref LABEL_COLON: Regex = Regex::new(
        r"^([A-Za-z][A-Za-z .]*?)\s*:"
    ).unwrap();

    // Loose dash-separated date such as "01-07-2024", used by inspection only
    pub static ref LOOSE_DATE: Regex = Regex::new(
        r"^\d{1,4}-\d{1,2}-\d{1,4}$"
    ).unwrap();
}
