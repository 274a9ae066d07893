//! Numeric helpers for raw field values.
//!
//! Tool output mixes units, thousands separators and trailing annotations
//! (`1,234 [632 GB]`, `36 (Min/Max 20/45)`, `85%`). These helpers pull the
//! number out and ignore the rest.

/// First whitespace token that starts with a digit.
fn numeric_token(raw: &str) -> Option<&str> {
    raw.split_whitespace()
        .find(|t| t.starts_with(|c: char| c.is_ascii_digit()))
}

/// Parse a non-negative integer count.
///
/// Thousands separators are stripped, `0x` hex is accepted, and only the
/// leading digits of composite values (`12345h+12m`, `1234:56`) are used.
pub fn count(raw: &str) -> Option<u64> {
    let tok = numeric_token(raw)?;
    if let Some(hex) = tok.strip_prefix("0x").or_else(|| tok.strip_prefix("0X")) {
        let digits: String = hex.chars().take_while(|c| c.is_ascii_hexdigit()).collect();
        return u64::from_str_radix(&digits, 16).ok();
    }
    let digits: String = tok
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | '\''))
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Parse a percentage (`85%`, `85`), clamped to 0..=100.
pub fn percent(raw: &str) -> Option<u8> {
    count(raw.trim().trim_end_matches('%')).map(|v| v.min(100) as u8)
}

/// Parse a temperature in °C (`31 Celsius`, `31 C (304 Kelvin)`).
pub fn celsius(raw: &str) -> Option<i64> {
    let tok = raw.split_whitespace().next()?;
    let digits: String = tok
        .chars()
        .enumerate()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '-'))
        .map(|(_, c)| c)
        .collect();
    digits.parse().ok()
}

/// Parse a size with an optional unit into bytes.
///
/// Units are binary (`kB` = 1024) the way dmidecode and /proc/meminfo use
/// them. A bare number is scaled by `default_unit`.
pub fn size_bytes(raw: &str, default_unit: u64) -> Option<u64> {
    let mut tokens = raw.split_whitespace();
    let num_tok = tokens.find(|t| t.starts_with(|c: char| c.is_ascii_digit()))?;
    let cleaned: String = num_tok.chars().filter(|c| *c != ',').collect();
    let end = cleaned
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(cleaned.len());
    let (num, glued_unit) = cleaned.split_at(end);
    let value: f64 = num.parse().ok()?;

    let unit = if glued_unit.is_empty() {
        tokens.next().unwrap_or("")
    } else {
        glued_unit
    };
    let mult = unit_multiplier(unit).unwrap_or(default_unit);
    Some((value * mult as f64).round() as u64)
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    const K: u64 = 1024;
    match unit.to_ascii_lowercase().as_str() {
        "b" | "byte" | "bytes" => Some(1),
        "k" | "kb" | "kib" => Some(K),
        "m" | "mb" | "mib" => Some(K * K),
        "g" | "gb" | "gib" => Some(K * K * K),
        "t" | "tb" | "tib" => Some(K * K * K * K),
        _ => None,
    }
}
