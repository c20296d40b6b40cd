//! National identity number (RUT) validation and formatting.

/// Compute the RUT check character for a digit body via the modulus-11
/// weighted sum. Weights cycle 2,3,4,5,6,7 starting from the least
/// significant digit.
fn check_char(body: &str) -> Option<char> {
    let mut sum: u32 = 0;
    let mut multiplier = 2;
    for c in body.chars().rev() {
        sum += c.to_digit(10)? * multiplier;
        multiplier = if multiplier == 7 { 2 } else { multiplier + 1 };
    }

    Some(match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10)?,
    })
}

/// Strip separators and uppercase, keeping only `[0-9K]`.
fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'k' || *c == 'K')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Validate a RUT: 7-8 digit body plus a check character (digit or 'K') whose
/// value matches the weighted modulus-11 computation. Separators (dots,
/// dashes, spaces) and case are ignored.
pub fn validate_national_id(raw: &str) -> bool {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let Some((body, dv)) = split_body(&cleaned) else {
        return false;
    };

    check_char(body) == Some(dv)
}

/// Split a cleaned RUT into a 7-8 digit body and its check character.
fn split_body(cleaned: &str) -> Option<(&str, char)> {
    if !cleaned.is_ascii() || !(8..=9).contains(&cleaned.len()) {
        return None;
    }
    let body = &cleaned[..cleaned.len() - 1];
    let dv = cleaned.chars().last()?;
    if !body.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !(dv.is_ascii_digit() || dv == 'K') {
        return None;
    }
    Some((body, dv))
}

/// Format a RUT for display: dots every three digits in the body, dash before
/// the check character (`123456785` → `12.345.678-5`). The input may be
/// partially typed or already formatted; everything but `[0-9kK]` is dropped
/// first, so re-formatting formatted text never corrupts the check character.
/// Empty input formats to the empty string.
pub fn format_national_id(raw: &str) -> String {
    let cleaned = clean(raw);
    if cleaned.len() <= 1 {
        return cleaned;
    }

    let body = &cleaned[..cleaned.len() - 1];
    let dv = &cleaned[cleaned.len() - 1..];

    let mut formatted = String::with_capacity(body.len() + body.len() / 3 + 2);
    for (i, c) in body.chars().enumerate() {
        if i > 0 && (body.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(c);
    }
    formatted.push('-');
    formatted.push_str(dv);
    formatted
}
