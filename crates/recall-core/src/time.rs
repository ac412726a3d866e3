use chrono::{DateTime, SecondsFormat, Utc};

/// Current UTC time as an RFC 3339 string, e.g. `2024-03-09T14:05:00Z`.
pub fn timestamp_now() -> String {
    format_utc(Utc::now())
}

/// RFC 3339 with whole seconds and a `Z` suffix.
pub fn format_utc(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_seconds_in_utc() {
        let at = DateTime::from_timestamp(1_700_000_000, 999_000_000).unwrap();
        assert_eq!(format_utc(at), "2023-11-14T22:13:20Z");
        assert_eq!(format_utc(DateTime::UNIX_EPOCH), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn now_parses_back() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'));
        let parsed = DateTime::parse_from_rfc3339(&ts).unwrap();
        assert!(parsed.timestamp() > 1_700_000_000);
    }
}
