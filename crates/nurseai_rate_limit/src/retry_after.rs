//! Reading the external service's wait hint.
//!
//! Sources, first match wins:
//! 1. `Retry-After` header as delay-seconds (`Retry-After: 5`)
//! 2. `Retry-After` header as an HTTP-date
//! 3. Google `RetryInfo` detail in the JSON error body (`"retryDelay": "37s"`)

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const RETRY_INFO_TYPE: &str = "type.googleapis.com/google.rpc.RetryInfo";

/// Wait hint from headers, falling back to the error body.
pub fn detect(headers: &HeaderMap, body: &str, now: DateTime<Utc>) -> Option<Duration> {
    from_headers(headers, now).or_else(|| from_error_body(body))
}

/// Parse the `Retry-After` header.
///
/// An HTTP-date in the past yields a zero wait.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use nurseai_rate_limit::retry_after;
/// use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
/// use std::time::Duration;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(RETRY_AFTER, HeaderValue::from_static("5"));
/// assert_eq!(retry_after::from_headers(&headers, Utc::now()), Some(Duration::from_secs(5)));
/// ```
pub fn from_headers(headers: &HeaderMap, now: DateTime<Utc>) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(seconds) = raw.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    match DateTime::parse_from_rfc2822(raw) {
        Ok(at) => {
            let wait = at.with_timezone(&Utc) - now;
            Some(wait.to_std().unwrap_or(Duration::ZERO))
        }
        Err(e) => {
            debug!(value = raw, error = %e, "Unparseable Retry-After header");
            None
        }
    }
}

/// Parse `error.details[].retryDelay` from a Google API error body.
pub fn from_error_body(body: &str) -> Option<Duration> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let details = parsed.get("error")?.get("details")?.as_array()?;

    details
        .iter()
        .filter(|detail| detail.get("@type").and_then(Value::as_str) == Some(RETRY_INFO_TYPE))
        .find_map(|detail| detail.get("retryDelay").and_then(Value::as_str))
        .and_then(parse_duration_string)
}

/// Parse protobuf-style durations such as `"37s"` or `"0.25s"`.
fn parse_duration_string(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().strip_suffix('s')?.parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn http_date_is_relative_to_now() {
        let now = DateTime::parse_from_rfc2822("Wed, 21 Oct 2026 07:28:00 GMT")
            .unwrap()
            .with_timezone(&Utc);
        let wait = from_headers(&headers("Wed, 21 Oct 2026 07:28:30 GMT"), now);
        assert_eq!(wait, Some(Duration::from_secs(30)));
    }

    #[test]
    fn http_date_in_past_is_zero() {
        let now = DateTime::parse_from_rfc2822("Wed, 21 Oct 2026 07:28:00 GMT")
            .unwrap()
            .with_timezone(&Utc);
        let wait = from_headers(&headers("Wed, 21 Oct 2026 07:00:00 GMT"), now);
        assert_eq!(wait, Some(Duration::ZERO));
    }

    #[test]
    fn garbage_header_is_ignored() {
        assert_eq!(from_headers(&headers("soon"), Utc::now()), None);
        assert_eq!(from_headers(&HeaderMap::new(), Utc::now()), None);
    }

    #[test]
    fn retry_info_in_body() {
        let body = r#"{
            "error": {
                "code": 429,
                "status": "RESOURCE_EXHAUSTED",
                "details": [
                    {"@type": "type.googleapis.com/google.rpc.QuotaFailure"},
                    {"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "37s"}
                ]
            }
        }"#;
        assert_eq!(from_error_body(body), Some(Duration::from_secs(37)));
        assert_eq!(from_error_body("not json"), None);
    }

    #[test]
    fn header_wins_over_body() {
        let body = r#"{"error":{"details":[{"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"37s"}]}}"#;
        assert_eq!(
            detect(&headers("5"), body, Utc::now()),
            Some(Duration::from_secs(5))
        );
        assert_eq!(
            detect(&HeaderMap::new(), body, Utc::now()),
            Some(Duration::from_secs(37))
        );
    }

    #[test]
    fn fractional_delay() {
        assert_eq!(parse_duration_string("0.5s"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration_string("-1s"), None);
        assert_eq!(parse_duration_string("12"), None);
    }

    #[test]
    fn oversized_retry_delay_is_dropped() {
        let body = r#"{"error":{"details":[{"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"1e30s"}]}}"#;
        assert_eq!(from_error_body(body), None);
        assert_eq!(parse_duration_string("NaNs"), None);
        assert_eq!(parse_duration_string("infs"), None);
    }
}
