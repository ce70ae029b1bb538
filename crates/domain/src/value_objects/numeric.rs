//! Lenient number parsing for values typed into the form or read from export codes.

/// Parse a stat value the way the registration form reads its inputs.
///
/// Leading whitespace and a leading `+` are skipped and the leading run of
/// digits is read ("42%" -> 42). Blank, non-numeric, negative or
/// overflowing input yields `None`, which the calculator treats as unset.
pub fn parse_stat(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Same as [`parse_stat`], for card levels.
pub fn parse_level(raw: &str) -> Option<u8> {
    parse_stat(raw).and_then(|v| u8::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_stat("50"), Some(50));
        assert_eq!(parse_stat(" 0 "), Some(0));
        assert_eq!(parse_stat("+7"), Some(7));
    }

    #[test]
    fn reads_leading_digits() {
        assert_eq!(parse_stat("42%"), Some(42));
        assert_eq!(parse_stat("12abc"), Some(12));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_stat(""), None);
        assert_eq!(parse_stat("abc"), None);
        assert_eq!(parse_stat("-5"), None);
        assert_eq!(parse_stat("99999999999"), None);
    }

    #[test]
    fn levels_fit_in_a_byte() {
        assert_eq!(parse_level("18"), Some(18));
        assert_eq!(parse_level("300"), None);
    }
}
