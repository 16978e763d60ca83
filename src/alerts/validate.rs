//! Checks applied to caller input before it is bound into SQL.

use crate::error::AlertsError;

pub const DEFAULT_LATEST_LIMIT: i64 = 3;

/// Country code: two or three ASCII letters.
pub fn iso(raw: &str) -> Result<String, AlertsError> {
    let raw = raw.trim();
    if (2..=3).contains(&raw.len()) && raw.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(raw.to_ascii_uppercase())
    } else {
        Err(AlertsError::invalid(format!("invalid iso code '{raw}'")))
    }
}

/// Non-negative integer identifier (`id1`, use-table id, `wdpaid`).
pub fn numeric_id(field: &str, raw: &str) -> Result<i64, AlertsError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id >= 0 => Ok(id),
        _ => Err(AlertsError::invalid(format!("invalid {field} '{raw}'"))),
    }
}

/// Geostore hash: required, ASCII alphanumerics plus `-` and `_`.
pub fn geostore_hash(raw: Option<&str>) -> Result<&str, AlertsError> {
    let hash = raw
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AlertsError::invalid("GeoJSON param required"))?;

    if hash
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        Ok(hash)
    } else {
        Err(AlertsError::invalid(format!("invalid geostore '{hash}'")))
    }
}

/// Row limit for the latest-dates query; defaults to 3.
pub fn limit(raw: Option<&str>) -> Result<i64, AlertsError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(DEFAULT_LATEST_LIMIT),
        Some(s) => match s.parse::<i64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(AlertsError::invalid(format!(
                "limit must be a positive integer, got '{s}'"
            ))),
        },
    }
}

/// `alertQuery` is on when present and not empty, `false` or `0`.
pub fn alert_query_flag(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        None | Some("") | Some("0") => false,
        Some(s) => !s.eq_ignore_ascii_case("false"),
    }
}
