use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a pt-BR formatted numeric token into a non-negative decimal.
///
/// Handles formats like:
/// - "1.234,5" -> 1234.5 (dot thousands, comma decimal)
/// - "12,5" -> 12.5 (comma is the decimal separator)
/// - "1.000.000" -> 1000000 (multiple dots are thousands separators)
/// - "4.000" -> 4000 (single dot followed by exactly three digits)
/// - "4.5" -> 4.5 (single dot, anything else: a decimal point)
///
/// Malformed input yields zero rather than failing the row. Fractional
/// precision is preserved; the value is later divided across operators.
pub fn parse_quantity(raw: &str) -> Decimal {
    let raw = raw.trim();
    if raw.is_empty() {
        return Decimal::ZERO;
    }

    let has_dot = raw.contains('.');
    let has_comma = raw.contains(',');

    let normalized = if has_dot && has_comma {
        // Both present: dots are thousands separators, comma is decimal.
        raw.replace('.', "").replace(',', ".")
    } else if has_comma {
        raw.replace(',', ".")
    } else if has_dot {
        normalize_dot_only(raw)
    } else {
        raw.to_string()
    };

    match Decimal::from_str(&normalized) {
        Ok(value) if value.is_sign_negative() => Decimal::ZERO,
        Ok(value) => value,
        Err(_) => Decimal::ZERO,
    }
}

/// Disambiguate a token containing only dots: more than one dot means
/// thousands grouping, as does a single dot with exactly three digits
/// after it ("4.000" is four thousand in these extracts).
fn normalize_dot_only(raw: &str) -> String {
    if raw.matches('.').count() > 1 {
        return raw.replace('.', "");
    }
    match raw.split_once('.') {
        Some((_, frac)) if frac.len() == 3 && frac.chars().all(|c| c.is_ascii_digit()) => {
            raw.replace('.', "")
        }
        _ => raw.to_string(),
    }
}
