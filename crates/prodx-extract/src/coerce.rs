//! Text cleanup and numeric coercion.
//!
//! Numbers on product pages arrive as display text: `"1,234 sold"`,
//! `"12.5k reviews"`, `"4.8"`, `"5 000+ sprzedanych"`. The scanner here
//! finds the first numeric run, drops thousand separators, honours a single
//! decimal point (or a decimal comma followed by one or two digits) and an
//! attached `k`/`m` multiplier. Anything that does not yield a number is
//! rejected so callers can omit the field instead of storing text in a
//! numeric slot.

/// Collapses every run of whitespace to one space and trims both ends.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes free text line by line: each line is whitespace-collapsed,
/// blank lines are dropped, and the remaining lines are joined with `\n`.
#[must_use]
pub fn normalize_multiline(text: &str) -> String {
    text.lines()
        .map(normalize_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses the first number in `text`, applying a `k`/`m` multiplier.
///
/// - `"12.5k"` → `12500.0`
/// - `"3.2m"` → `3200000.0`
/// - `"1,234"` → `1234.0`
/// - `"N/A"` → `None`
#[must_use]
pub fn parse_scaled_number(text: &str) -> Option<f64> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let start = (0..len).find(|&i| {
        chars[i].is_ascii_digit()
            || (chars[i] == '.' && i + 1 < len && chars[i + 1].is_ascii_digit())
    })?;

    let mut integer_digits = String::new();
    let mut fraction_digits = String::new();
    let mut in_fraction = false;
    let mut i = start;

    while i < len {
        let c = chars[i];
        if c.is_ascii_digit() {
            if in_fraction {
                fraction_digits.push(c);
            } else {
                integer_digits.push(c);
            }
            i += 1;
        } else if c == '.' && !in_fraction && i + 1 < len && chars[i + 1].is_ascii_digit() {
            in_fraction = true;
            i += 1;
        } else if c == ','
            && !in_fraction
            && !integer_digits.is_empty()
            && is_decimal_comma_tail(&chars, i + 1)
        {
            in_fraction = true;
            i += 1;
        } else if is_group_separator(c)
            && !in_fraction
            && !integer_digits.is_empty()
            && is_digit_group(&chars, i + 1)
        {
            i += 1;
        } else {
            break;
        }
    }

    let scale = match chars.get(i) {
        Some('k' | 'K') if !chars.get(i + 1).is_some_and(|c| c.is_alphabetic()) => 1_000.0,
        Some('m' | 'M') if !chars.get(i + 1).is_some_and(|c| c.is_alphabetic()) => 1_000_000.0,
        _ => 1.0,
    };

    // Scale the digits as an integer mantissa before dividing out the
    // fraction so "12.3k" lands on exactly 12300.
    let mantissa: f64 = format!("{integer_digits}{fraction_digits}").parse().ok()?;
    let exponent = i32::try_from(fraction_digits.len()).ok()?;
    let value = mantissa * scale / 10f64.powi(exponent);
    value.is_finite().then_some(value)
}

/// Coerces display text to a float. See [`parse_scaled_number`].
#[must_use]
pub fn coerce_float(text: &str) -> Option<f64> {
    parse_scaled_number(text)
}

/// Coerces display text to an integer. The scaled value must be integral.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn coerce_int(text: &str) -> Option<i64> {
    let value = parse_scaled_number(text)?;
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded.abs() >= 9.0e15 {
        return None;
    }
    Some(rounded as i64)
}

/// Returns the first `N` or `N.N` number in `text` without scaling or
/// separator handling. Used on class names such as `"star-4.5"`.
#[must_use]
pub fn first_decimal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let start = bytes.iter().position(u8::is_ascii_digit)?;
    let mut end = start;
    let mut has_dot = false;
    while end < len {
        if bytes[end].is_ascii_digit() {
            end += 1;
        } else if bytes[end] == b'.' && !has_dot && end + 1 < len && bytes[end + 1].is_ascii_digit()
        {
            has_dot = true;
            end += 1;
        } else {
            break;
        }
    }
    text[start..end].parse().ok()
}

fn is_group_separator(c: char) -> bool {
    matches!(c, ',' | ' ' | '\u{a0}' | '\u{202f}')
}

/// True when one or two digits start at `at` and no further digit follows,
/// as in `"4,8"` or `"96,45 zł"`.
fn is_decimal_comma_tail(chars: &[char], at: usize) -> bool {
    let digits = chars[at.min(chars.len())..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    matches!(digits, 1 | 2)
}

/// True when exactly three digits start at `at` and no fourth digit follows.
fn is_digit_group(chars: &[char], at: usize) -> bool {
    at + 3 <= chars.len()
        && chars[at..at + 3].iter().all(char::is_ascii_digit)
        && !chars.get(at + 3).is_some_and(char::is_ascii_digit)
}
