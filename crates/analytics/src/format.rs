//! Number formatting for KPI cards and chart labels.

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Two decimals followed by the currency suffix, e.g. `"1234.50 Rs."`.
pub fn format_currency(value: f64, suffix: &str) -> String {
    if suffix.is_empty() {
        format!("{value:.2}")
    } else {
        format!("{value:.2} {suffix}")
    }
}

/// Percentage with one decimal, e.g. `"12.5%"`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Compact SI notation with two significant digits (`12k`, `1.2M`, `500m`).
pub fn format_si(value: f64) -> String {
    format_si_with_precision(value, 2)
}

/// Compact SI notation with `precision` significant digits.
///
/// Digits are padded with zeros rather than trimmed, so `2` renders as `2.0`
/// at two significant digits.
pub fn format_si_with_precision(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let precision = precision.max(1);
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    let (digits, exponent) = decimal_parts(abs, precision);
    let prefix_exponent = exponent.div_euclid(3).clamp(-8, 8);
    // Number of digits left of the decimal point once scaled by the prefix.
    let int_digits = exponent - prefix_exponent * 3 + 1;
    let len = digits.len() as i32;

    let body = if int_digits == len {
        digits
    } else if int_digits > len {
        format!("{digits}{}", "0".repeat((int_digits - len) as usize))
    } else if int_digits > 0 {
        let (whole, frac) = digits.split_at(int_digits as usize);
        format!("{whole}.{frac}")
    } else {
        // Below the smallest prefix: shrink the significant digits to fit.
        let reduced = (precision as i32 + int_digits - 1).max(1) as usize;
        let (digits, _) = decimal_parts(abs, reduced);
        format!("0.{}{digits}", "0".repeat((-int_digits) as usize))
    };

    let prefix = SI_PREFIXES[(8 + prefix_exponent) as usize];
    format!("{sign}{body}{prefix}")
}

/// Significant digits of an `f64`'s exact decimal expansion never exceed this.
const EXACT_DIGITS: usize = 767;

/// Significant digits (no decimal point) and base-10 exponent of `value`,
/// rounded to `precision` digits with exact ties rounded away from zero.
fn decimal_parts(value: f64, precision: usize) -> (String, i32) {
    if is_exact_tie(value, precision) {
        // Tie means the digit after the cut is exactly 5, so this is exact.
        let (digits, exponent) = scientific(value, precision + 1);
        return round_up(&digits[..precision], exponent);
    }
    scientific(value, precision)
}

/// `value` formatted with `digits` significant digits, split into mantissa
/// digits and exponent.
fn scientific(value: f64, digits: usize) -> (String, i32) {
    let formatted = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
    let exponent = exponent.parse::<i32>().unwrap_or(0);
    (mantissa.replace('.', ""), exponent)
}

/// Whether the digits of `value` past the first `precision` are exactly `5`.
fn is_exact_tie(value: f64, precision: usize) -> bool {
    if value == 0.0 {
        return false;
    }
    let tail_is_half = |digits: &str| {
        digits
            .get(precision..)
            .and_then(|tail| tail.strip_prefix('5'))
            .is_some_and(|rest| rest.bytes().all(|b| b == b'0'))
    };
    // Cheap guard first; most values fail here.
    tail_is_half(&scientific(value, precision + 20).0)
        && tail_is_half(&scientific(value, EXACT_DIGITS.max(precision + 1)).0)
}

fn round_up(digits: &str, exponent: i32) -> (String, i32) {
    let mut bytes = digits.as_bytes().to_vec();
    for b in bytes.iter_mut().rev() {
        if *b == b'9' {
            *b = b'0';
        } else {
            *b += 1;
            return (String::from_utf8_lossy(&bytes).into_owned(), exponent);
        }
    }
    // All nines: 9.9 -> 10, keeping the digit count.
    let mut carried = String::with_capacity(digits.len());
    carried.push('1');
    carried.push_str(&"0".repeat(digits.len() - 1));
    (carried, exponent + 1)
}
