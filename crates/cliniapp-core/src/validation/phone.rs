//! Chilean phone number validation and formatting.

/// Keep only ASCII digits.
fn digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Accepts mobile numbers in three shapes: `569XXXXXXXX` (11 digits with
/// country code), `9XXXXXXXX` (9 digits), or a bare 8-digit local number.
/// Separators and a leading `+` are ignored.
pub fn validate_phone(raw: &str) -> bool {
    let d = digits(raw);
    (d.len() == 11 && d.starts_with("569"))
        || (d.len() == 9 && d.starts_with('9'))
        || d.len() == 8
}

/// Normalize any accepted phone shape to `+56 9 XXXX XXXX`. Unrecognized
/// shapes pass through unchanged; empty input formats to the empty string.
pub fn format_phone(raw: &str) -> String {
    let d = digits(raw);

    if d.is_empty() {
        return String::new();
    }

    if d.len() == 9 && d.starts_with('9') {
        return format!("+56 {} {} {}", &d[..1], &d[1..5], &d[5..]);
    }

    // Bare 8-digit local number, assume mobile
    if d.len() == 8 {
        return format!("+56 9 {} {}", &d[..4], &d[4..]);
    }

    if d.len() == 11 && d.starts_with("569") {
        return format!("+56 {} {} {}", &d[2..3], &d[3..7], &d[7..]);
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_shapes() {
        assert!(validate_phone("+56 9 1234 5678"));
        assert!(validate_phone("912345678"));
        assert!(validate_phone("12345678"));
        assert!(validate_phone("56912345678"));
    }

    #[test]
    fn test_rejected_shapes() {
        assert!(!validate_phone(""));
        assert!(!validate_phone("812345678")); // 9 digits but not mobile
        assert!(!validate_phone("1234567")); // too short
        assert!(!validate_phone("5691234567890")); // too long
    }

    #[test]
    fn test_format_normalizes() {
        assert_eq!(format_phone("912345678"), "+56 9 1234 5678");
        assert_eq!(format_phone("12345678"), "+56 9 1234 5678");
        assert_eq!(format_phone("56912345678"), "+56 9 1234 5678");
        assert_eq!(format_phone("+56 9 1234 5678"), "+56 9 1234 5678");
    }

    #[test]
    fn test_format_passthrough() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("02-123"), "02-123");
        assert_eq!(format_phone("812345678"), "812345678");
    }
}
