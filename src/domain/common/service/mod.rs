//! Shared domain helpers used by several services.

pub mod notify;
#[cfg(test)]
pub mod test_support;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::errors::bad_request;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Last second of `date` in UTC.
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let last = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    date.and_time(last).and_utc()
}

/// Trim, and turn blank strings into `None`.
pub fn normalize_opt(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse an optional query code such as `?status=pending`; blank means unset.
pub fn parse_code<T>(
    raw: Option<&str>,
    what: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> anyhow::Result<Option<T>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(code) => parse(code)
            .map(Some)
            .ok_or_else(|| bad_request(format!("unknown {what} '{code}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_of_day_is_last_second() {
        let date: NaiveDate = "2030-05-01".parse().unwrap();
        assert_eq!(end_of_day(date).to_rfc3339(), "2030-05-01T23:59:59+00:00");
    }

    #[test]
    fn parse_code_rejects_unknown_values() {
        let parsed = parse_code(Some("nope"), "status", |c| (c == "ok").then_some(1));
        assert!(parsed.is_err());
        assert_eq!(parse_code(Some(" "), "status", |_| Some(1)).unwrap(), None);
        assert_eq!(parse_code(Some("ok"), "status", |c| (c == "ok").then_some(1)).unwrap(), Some(1));
    }

    #[test]
    fn normalize_opt_drops_blanks() {
        assert_eq!(normalize_opt(Some("  ".into())), None);
        assert_eq!(normalize_opt(Some(" x ".into())), Some("x".into()));
        assert_eq!(normalize_opt(None), None);
    }
}
