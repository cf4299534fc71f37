use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Escapes the three characters the site's inline editors escape before
/// writing user text back into markup.
pub fn html_encode(value: &str) -> String {
    value
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Reads the leading integer of `value` the way browsers do for badge and
/// input text: leading whitespace and an optional sign, then digits up to the
/// first non-digit. Returns `None` when no digit is found.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    static LEADING_INT: OnceLock<Regex> = OnceLock::new();
    let re = LEADING_INT
        .get_or_init(|| Regex::new(r"^\s*([+-]?)(\d+)").expect("static leading int pattern"));
    let caps = re.captures(value)?;
    let negative = &caps[1] == "-";
    // Out-of-range badges clamp instead of reading as zero.
    let parsed = caps[2].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -parsed } else { parsed })
}

pub fn bool_param(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub fn parse_filenames_csv(value: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for part in value.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        if seen.insert(item.to_string()) {
            out.push(item.to_string());
        }
    }
    out
}

/// Parses a money amount typed by the user ("12", "12.5", "12,50").
pub fn parse_amount(value: &str) -> Result<f64, String> {
    let normalized = value.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err("amount is empty".to_string());
    }
    let amount: f64 = normalized
        .parse()
        .map_err(|_| format!("invalid amount '{}'", value.trim()))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err("amount must be a non-negative number".to_string());
    }
    Ok(amount)
}

pub fn format_amount(amount: f64) -> String {
    let rendered = format!("{amount:.2}");
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}
