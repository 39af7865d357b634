//! Plate numbers, reference codes and certificate filenames

/// Digits shown on the identifier plate
const PLATE_DIGITS: usize = 4;

/// Derive the 4-digit plate code from a record id
///
/// Non-digits are stripped, the rightmost four digits kept and the result
/// left-padded with zeros. An id without digits yields "0000".
///
/// # Examples
/// ```
/// use permit_format::plate_number;
/// assert_eq!(plate_number("BUS20240001"), "0001");
/// assert_eq!(plate_number("7"), "0007");
/// assert_eq!(plate_number("abc"), "0000");
/// ```
pub fn plate_number(id: &str) -> String {
    let digits: Vec<char> = id.chars().filter(|c| c.is_ascii_digit()).collect();
    let tail: String = digits[digits.len().saturating_sub(PLATE_DIGITS)..].iter().collect();
    format!("{tail:0>width$}", width = PLATE_DIGITS)
}

/// Encode a timestamp (nanoseconds) as an uppercase base-36 token
pub fn reference_token(timestamp_nanos: u128) -> String {
    const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    if timestamp_nanos == 0 {
        return "0".to_string();
    }

    let mut n = timestamp_nanos;
    let mut out = Vec::new();
    while n > 0 {
        out.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();

    String::from_utf8_lossy(&out).into_owned()
}

/// Reference printed in the footer: record id plus timestamp token
pub fn reference_code(id: &str, timestamp_nanos: u128) -> String {
    format!("{id}-{}", reference_token(timestamp_nanos))
}

/// Deterministic download name: `{permitType}-{id}-Digital-Copy.pdf`
///
/// Each run of whitespace in the permit type becomes a single hyphen.
///
/// # Examples
/// ```
/// use permit_format::certificate_filename;
/// assert_eq!(
///     certificate_filename("Business Permit", "BUS20240001"),
///     "Business-Permit-BUS20240001-Digital-Copy.pdf"
/// );
/// ```
pub fn certificate_filename(permit_type: &str, id: &str) -> String {
    let mut hyphenated = String::with_capacity(permit_type.len());
    let mut in_space = false;
    for c in permit_type.chars() {
        if c.is_whitespace() {
            if !in_space {
                hyphenated.push('-');
            }
            in_space = true;
        } else {
            hyphenated.push(c);
            in_space = false;
        }
    }

    format!("{hyphenated}-{id}-Digital-Copy.pdf")
}
