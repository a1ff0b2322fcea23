//! Phone number display formatting.

/// Format a raw phone string for display.
///
/// Non-digit characters are discarded; if exactly ten digits remain the
/// result is `(AAA) BBB-CCCC`. Any other digit count returns the input
/// unchanged. Stored values are never rewritten with this.
///
/// ```
/// use local_directory_core::format_phone;
///
/// assert_eq!(format_phone("6305551234"), "(630) 555-1234");
/// assert_eq!(format_phone("630-555-1234x2"), "630-555-1234x2");
/// ```
#[must_use]
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    match (digits.get(0..3), digits.get(3..6), digits.get(6..)) {
        (Some(area), Some(exchange), Some(line)) if digits.len() == 10 => {
            format!("({area}) {exchange}-{line}")
        }
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_digits_formatted() {
        assert_eq!(format_phone("6305551234"), "(630) 555-1234");
    }

    #[test]
    fn test_punctuated_ten_digits_formatted() {
        assert_eq!(format_phone("630.555.1234"), "(630) 555-1234");
        assert_eq!(format_phone("(630) 555-9012"), "(630) 555-9012");
    }

    #[test]
    fn test_extension_left_unchanged() {
        assert_eq!(format_phone("630-555-1234x2"), "630-555-1234x2");
    }

    #[test]
    fn test_country_code_left_unchanged() {
        assert_eq!(format_phone("+1 630 555 1234"), "+1 630 555 1234");
    }

    #[test]
    fn test_short_and_empty_left_unchanged() {
        assert_eq!(format_phone("555-1234"), "555-1234");
        assert_eq!(format_phone(""), "");
    }
}
