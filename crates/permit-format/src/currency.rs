//! Currency formatting

/// Prefix placed before every formatted amount
pub const CURRENCY_CODE: &str = "PHP";

/// A monetary amount as received from a permit record
///
/// Fees arrive as numbers, numeric strings, garbage or nothing at all; every
/// form converts to a finite value, with 0 standing in for anything that
/// does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Amount(pub f64);

impl Amount {
    fn finite(n: f64) -> Self {
        if n.is_finite() {
            Self(n)
        } else {
            Self(0.0)
        }
    }
}

impl From<f64> for Amount {
    fn from(n: f64) -> Self {
        Self::finite(n)
    }
}

impl From<i64> for Amount {
    fn from(n: i64) -> Self {
        Self(n as f64)
    }
}

impl From<&str> for Amount {
    fn from(s: &str) -> Self {
        parse_float_prefix(s).map(Self::finite).unwrap_or_default()
    }
}

impl<T: Into<Amount>> From<Option<T>> for Amount {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Parse the longest numeric prefix of a string
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"12abc"`
/// parses as 12 and `"1,500"` as 1. Returns `None` when no digits lead the
/// string.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Format an amount with two decimals, thousands separators and the currency prefix
///
/// # Examples
/// ```
/// use permit_format::format_currency;
/// assert_eq!(format_currency(1234.5), "PHP 1,234.50");
/// assert_eq!(format_currency("abc"), "PHP 0.00");
/// assert_eq!(format_currency(None::<f64>), "PHP 0.00");
/// ```
pub fn format_currency(value: impl Into<Amount>) -> String {
    let Amount(n) = value.into();
    let fixed = format!("{:.2}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    // Rounding can turn tiny negatives into zero; never print "-0.00"
    let sign = if n < 0.0 && fixed != "0.00" { "-" } else { "" };

    format!(
        "{CURRENCY_CODE} {sign}{}.{frac_part}",
        format_with_thousands(int_part, ',')
    )
}

/// Insert a separator between every group of three digits
pub fn format_with_thousands(digits: &str, sep: char) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(sep);
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_currency_numbers() {
        assert_eq!(format_currency(0.0), "PHP 0.00");
        assert_eq!(format_currency(5.0), "PHP 5.00");
        assert_eq!(format_currency(1234.5), "PHP 1,234.50");
        assert_eq!(format_currency(1_000_000_i64), "PHP 1,000,000.00");
        assert_eq!(format_currency(999.999), "PHP 1,000.00");
    }

    #[test]
    fn test_format_currency_strings() {
        assert_eq!(format_currency("15000"), "PHP 15,000.00");
        assert_eq!(format_currency("  250.75 "), "PHP 250.75");
        assert_eq!(format_currency("abc"), "PHP 0.00");
        assert_eq!(format_currency(""), "PHP 0.00");
        assert_eq!(format_currency("12abc"), "PHP 12.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-1234.5), "PHP -1,234.50");
        assert_eq!(format_currency(-0.001), "PHP 0.00");
    }

    #[test]
    fn test_format_currency_non_finite() {
        assert_eq!(format_currency(f64::NAN), "PHP 0.00");
        assert_eq!(format_currency(f64::INFINITY), "PHP 0.00");
        assert_eq!(format_currency("1e999"), "PHP 0.00");
    }

    #[test]
    fn test_format_currency_option() {
        assert_eq!(format_currency(Some(42.0)), "PHP 42.00");
        assert_eq!(format_currency(None::<&str>), "PHP 0.00");
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("3.14"), Some(3.14));
        assert_eq!(parse_float_prefix("-2"), Some(-2.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("1,500"), Some(1.0));
        assert_eq!(parse_float_prefix("2e3x"), Some(2000.0));
        assert_eq!(parse_float_prefix("2e"), Some(2.0));
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("PHP 5"), None);
    }

    #[test]
    fn test_format_with_thousands() {
        assert_eq!(format_with_thousands("0", ','), "0");
        assert_eq!(format_with_thousands("123", ','), "123");
        assert_eq!(format_with_thousands("1234", ','), "1,234");
        assert_eq!(format_with_thousands("1234567", ','), "1,234,567");
    }
}
