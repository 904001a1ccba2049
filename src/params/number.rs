//! Lenient numeric coercion for query values.
//!
//! Mirrors what a browser-facing service receives in practice: `width=300`,
//! `width= 300 `, `width=3e2`, `width=0x12c` all mean 300, while garbage
//! becomes 0 instead of an error.

/// Coerce a raw query value to a number, treating anything unparseable as 0.
///
/// Absent values, empty strings and non-numeric text all yield `0.0`.
/// Negative zero is normalized to `0.0`.
pub fn coerce_or_zero(raw: Option<&str>) -> f64 {
    let value = raw.map(to_number).unwrap_or(0.0);
    if value.is_nan() || value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Convert text to a number with JavaScript `Number()` rules.
///
/// Returns NaN when the text is not a numeric literal.
pub fn to_number(raw: &str) -> f64 {
    let s = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_radix_literal(s) {
        return value;
    }

    // Rust's float grammar also accepts "inf", "nan" and friends; only
    // plain decimal literals are numbers here.
    let decimal_chars = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !decimal_chars {
        return f64::NAN;
    }

    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse `0x`, `0o` and `0b` prefixed integers. Signs are not allowed.
fn parse_radix_literal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    let mut value = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * radix as f64 + d as f64,
            None => return Some(f64::NAN),
        }
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_integers() {
        assert_eq!(to_number("300"), 300.0);
        assert_eq!(to_number("-12"), -12.0);
        assert_eq!(to_number("+7"), 7.0);
    }

    #[test]
    fn test_whitespace_and_empty() {
        assert_eq!(to_number("  42\t"), 42.0);
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("   "), 0.0);
    }

    #[test]
    fn test_decimal_forms() {
        assert_eq!(to_number("3e2"), 300.0);
        assert_eq!(to_number(".5"), 0.5);
        assert_eq!(to_number("12.75"), 12.75);
    }

    #[test]
    fn test_radix_prefixes() {
        assert_eq!(to_number("0x12c"), 300.0);
        assert_eq!(to_number("0o17"), 15.0);
        assert_eq!(to_number("0b101"), 5.0);
        assert!(to_number("0x").is_nan());
        assert!(to_number("-0x10").is_nan());
    }

    #[test]
    fn test_infinity_spelling_is_exact() {
        assert_eq!(to_number("Infinity"), f64::INFINITY);
        assert_eq!(to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(to_number("inf").is_nan());
        assert!(to_number("NaN").is_nan());
        assert!(to_number("infinity").is_nan());
    }

    #[test]
    fn test_garbage_is_nan() {
        assert!(to_number("abc").is_nan());
        assert!(to_number("12px").is_nan());
        assert!(to_number("1e").is_nan());
        assert!(to_number("1,000").is_nan());
    }

    #[test]
    fn test_coerce_or_zero() {
        assert_eq!(coerce_or_zero(None), 0.0);
        assert_eq!(coerce_or_zero(Some("abc")), 0.0);
        assert_eq!(coerce_or_zero(Some("-0")), 0.0);
        assert!(coerce_or_zero(Some("-0")).is_sign_positive());
        assert_eq!(coerce_or_zero(Some("250")), 250.0);
    }
}
