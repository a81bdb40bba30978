use serde_json::Value;

use crate::types::EntryId;

/// Largest float that still converts to an i64 without saturating
const MAX_EXACT_ID: f64 = 9_223_372_036_854_775_807.0;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdListError {
    #[error("ids is not valid JSON: {0}")]
    NotJson(String),
    #[error("ids is not a JSON array")]
    NotAnArray,
    #[error("ids[{index}] is not a non-negative integer: {value}")]
    InvalidElement { index: usize, value: String },
}

/// Decode the JSON-encoded `ids` form field.
///
/// All-or-nothing: one bad element rejects the whole batch.
pub fn parse_entry_ids(raw: &str) -> Result<Vec<EntryId>, IdListError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| IdListError::NotJson(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(IdListError::NotAnArray);
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            parse_entry_id(item).ok_or_else(|| IdListError::InvalidElement {
                index,
                value: item.to_string(),
            })
        })
        .collect()
}

/// Accepts integral, non-negative numbers and numeric strings: `3`, `3.0`,
/// `"3"`, `" 3"`, `"1e2"`. Rejects fractions, negatives, booleans and null.
pub fn parse_entry_id(value: &Value) -> Option<EntryId> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                i64::try_from(u).ok().and_then(EntryId::new)
            } else if n.is_i64() {
                None
            } else {
                n.as_f64().and_then(entry_id_from_float)
            }
        }
        Value::String(s) => parse_numeric_id(s),
        _ => None,
    }
}

/// Same rules as a JSON string element, for ids taken from the URL path
pub fn parse_numeric_id(raw: &str) -> Option<EntryId> {
    let s = raw.trim_matches(is_numeric_whitespace);
    let digits = s.strip_prefix('+').unwrap_or(s);

    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return digits.parse::<i64>().ok().and_then(EntryId::new);
    }

    if !is_numeric_literal(s) {
        return None;
    }
    s.parse::<f64>().ok().and_then(entry_id_from_float)
}

/// Only ASCII whitespace may pad a numeric string; `\u{3000}5` is not an id
fn is_numeric_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

fn entry_id_from_float(f: f64) -> Option<EntryId> {
    if !f.is_finite() || f.fract() != 0.0 || f < 0.0 || f >= MAX_EXACT_ID {
        return None;
    }
    EntryId::new(f as i64)
}

/// `[+-]? (digits ['.' digits*] | '.' digits) ([eE] [+-]? digits)?`
///
/// Excludes what `f64::from_str` would also take (`inf`, `NaN`, `infinity`).
fn is_numeric_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    let skip_digits = |i: &mut usize| {
        let start = *i;
        while *i < bytes.len() && bytes[*i].is_ascii_digit() {
            *i += 1;
        }
        *i - start
    };

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let mut mantissa = skip_digits(&mut i);
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        mantissa += skip_digits(&mut i);
    }
    if mantissa == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        if skip_digits(&mut i) == 0 {
            return false;
        }
    }

    i == bytes.len()
}
