//! Permit Format - value formatting for permit certificates
//!
//! This crate provides:
//! - Currency formatting with thousands separators ("PHP 1,234.50")
//! - Long-form dates ("January 15, 2024") with an "N/A" default
//! - 4-digit plate numbers derived from record ids
//! - Reference tokens and deterministic certificate filenames
//!
//! Every formatter is total: malformed input yields a documented default
//! instead of an error.
//!
//! # Example
//!
//! ```
//! use permit_format::{format_currency, format_date, plate_number};
//!
//! assert_eq!(format_currency("15000"), "PHP 15,000.00");
//! assert_eq!(format_date(Some("2024-01-15")), "January 15, 2024");
//! assert_eq!(format_date(None), "N/A");
//! assert_eq!(plate_number("BUS20240001"), "0001");
//! ```

mod currency;
mod date;
mod identifier;

pub use currency::{format_currency, format_with_thousands, parse_float_prefix, Amount, CURRENCY_CODE};
pub use date::{format_date, parse_date, DATE_FORMAT};
pub use identifier::{certificate_filename, plate_number, reference_code, reference_token};

/// Placeholder for absent values
pub const NOT_AVAILABLE: &str = "N/A";
