//! Lenient numeric coercion and number rendering for calculation strings.
//!
//! Form values arrive as free text. Coercion reads the longest numeric prefix
//! and never fails; callers decide what a missing number means.

/// Parses the longest leading float in `raw`, skipping leading whitespace.
///
/// Accepts an optional sign, `Infinity`, digits with an optional fraction, and
/// an exponent when it is followed by digits. Returns `None` when no digits are
/// present.
pub fn parse_float(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if text[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let integer_digits = count_digits(&bytes[end..]);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = count_digits(&bytes[end + 1..]);
        if integer_digits > 0 || fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }

    if integer_digits == 0 && fraction_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+') | Some(b'-')) {
            exponent_end += 1;
        }
        let exponent_digits = count_digits(&bytes[exponent_end..]);
        if exponent_digits > 0 {
            end = exponent_end + exponent_digits;
        }
    }

    text[..end].parse::<f64>().ok()
}

/// Parses the longest leading base-10 integer in `raw`.
pub fn parse_int(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
    let digits = count_digits(&bytes[sign_len..]);
    if digits == 0 {
        return None;
    }

    text[..sign_len + digits].parse::<f64>().ok()
}

/// Coerces a raw field to a number, treating anything that is not a non-zero
/// number as `0.0`.
pub fn number_or_zero(raw: &str) -> f64 {
    match parse_float(raw) {
        Some(value) if value != 0.0 && !value.is_nan() => value,
        _ => 0.0,
    }
}

/// Renders a number in its shortest round-trip form, the way operands are
/// shown inside calculation strings (`2000`, `0.5`, `1e+21`).
pub fn plain(value: f64) -> String {
    if let Some(word) = non_finite_word(value) {
        return word.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let scientific = format!("{value:e}");
        return match scientific.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => scientific,
        };
    }

    format!("{value}")
}

/// Renders a number with a fixed count of decimals.
///
/// An exact tie rounds the magnitude up (`0.125` gives `0.13`, `-0.125` gives
/// `-0.13`); every other value rounds to the nearest representable digit.
pub fn fixed(value: f64, decimals: usize) -> String {
    if let Some(word) = non_finite_word(value) {
        return word.to_string();
    }
    if value.abs() >= 1e21 {
        return plain(value);
    }

    // -0.0 renders without a sign
    let value = if value == 0.0 { 0.0 } else { value };
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    match round_tie_up(magnitude, decimals) {
        Some(digits) => format!("{sign}{digits}"),
        None => format!("{sign}{magnitude:.decimals$}"),
    }
}

/// Digits of a non-negative finite `magnitude` rounded up at `decimals`, or
/// `None` when the exact expansion is not a tie at that position.
fn round_tie_up(magnitude: f64, decimals: usize) -> Option<String> {
    // every finite f64 has at most this many fractional decimal digits
    const EXACT_FRACTION_DIGITS: usize = 1074;

    let precision = EXACT_FRACTION_DIGITS;
    let exact = format!("{magnitude:.precision$}");
    let (integer, fraction) = exact.split_once('.')?;
    let (kept, rest) = fraction.split_at(decimals.min(fraction.len()));
    let mut rest = rest.bytes();
    if rest.next() != Some(b'5') || !rest.all(|digit| digit == b'0') {
        return None;
    }

    let mut digits: Vec<u8> = integer.bytes().chain(kept.bytes()).collect();
    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }

    let split = digits.len() - kept.len();
    let (integer, fraction) = digits.split_at(split);
    let integer = String::from_utf8_lossy(integer);
    if fraction.is_empty() {
        Some(integer.into_owned())
    } else {
        Some(format!("{integer}.{}", String::from_utf8_lossy(fraction)))
    }
}

/// Rounds to two decimals with the same tie rule as [`fixed`], the precision
/// every metric is displayed with.
pub fn round2(value: f64) -> f64 {
    fixed(value, 2).parse().unwrap_or(value)
}

fn non_finite_word(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("Infinity")
    } else if value == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}
