// Utility helpers for parsing cells and formatting numbers.
//
// This module centralizes all the "dirty" CSV cell handling so the
// normalizers can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

use crate::types::{Cell, RawRow};

/// How a text cell should be cleaned before the float parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericFormat {
    /// Strip `%` only.
    Plain,
    /// Strip `%` and `,` thousands separators.
    Thousands,
}

/// Convert a cell into a finite `f64`, never failing.
///
/// - Missing key or `Null` -> `0`.
/// - `Number` -> returned unchanged.
/// - `Text` -> `%` (and `,` for [`NumericFormat::Thousands`]) removed,
///   trimmed, then the longest leading decimal literal is parsed.
///   Nothing parseable -> `0`.
pub fn parse_numeric(raw: Option<&Cell>, format: NumericFormat) -> f64 {
    let v = match raw {
        None | Some(Cell::Null) => 0.0,
        Some(Cell::Number(n)) => *n,
        Some(Cell::Text(s)) => {
            let cleaned: String = s
                .chars()
                .filter(|c| *c != '%' && !(format == NumericFormat::Thousands && *c == ','))
                .collect();
            leading_float(cleaned.trim()).unwrap_or(0.0)
        }
    };
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Parse the longest prefix of `s` that forms a decimal literal
/// (`[+-]digits[.digits][e[+-]digits]`).
fn leading_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0usize;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > frac_start {
            digits += j - frac_start;
            end = j;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut j = end + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// First candidate key present on the row. Only a missing key counts as
/// absent: `Null`, `0` and `""` are all returned as-is.
pub fn lookup<'a>(row: &'a RawRow, candidates: &[&str]) -> Option<&'a Cell> {
    candidates.iter().find_map(|key| row.get(key))
}

pub fn resolve_field(row: &RawRow, candidates: &[&str], fallback: Cell) -> Cell {
    lookup(row, candidates).cloned().unwrap_or(fallback)
}

/// Resolve a required text field. A present-but-empty cell gives `""`;
/// `default` is used only when no candidate column exists.
pub fn resolve_text(row: &RawRow, candidates: &[&str], default: &str) -> String {
    match lookup(row, candidates) {
        None => default.to_string(),
        Some(cell) => cell_text(cell).unwrap_or_default(),
    }
}

pub fn resolve_opt_text(row: &RawRow, candidates: &[&str]) -> Option<String> {
    lookup(row, candidates).and_then(cell_text)
}

fn cell_text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Null => None,
        Cell::Number(n) => Some(render_number(*n)),
        Cell::Text(s) => Some(s.trim().to_string()),
    }
}

// `2023.0` renders as `2023`, the way the column was written.
fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Mean of `v`, 0 when empty.
pub fn average(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    v.iter().sum::<f64>() / v.len() as f64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

pub fn fmt_money(v: &f64) -> String {
    format!("${}", format_number(*v, 2))
}

pub fn fmt_pct(v: &f64) -> String {
    format_number(*v, 1)
}

pub fn fmt_opt_pct(v: &Option<f64>) -> String {
    match v {
        Some(v) => fmt_pct(v),
        None => "-".to_string(),
    }
}

/// Shorten long brand names for table display.
pub fn truncate_label(s: &str) -> String {
    if s.chars().count() > 25 {
        let head: String = s.chars().take(22).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
