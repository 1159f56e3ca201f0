//! Lexical rules shared by the matchers.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{noise_threshold, parse_amount, parse_amount_above};
pub use dates::{is_iso_date, iso_date_part};
pub use patterns::*;
