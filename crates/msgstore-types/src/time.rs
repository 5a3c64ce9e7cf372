use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a caller-supplied event time.
///
/// Accepted forms, tried in order:
/// - RFC 3339 (`2013-11-28T23:07:40+00:00`, `2013-11-28T23:07:40Z`)
/// - naive `YYYY-MM-DDTHH:MM:SS[.fff]`, taken as UTC
/// - plain date `YYYY-MM-DD`, taken as midnight UTC
pub fn parse_event_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Inclusive event-time window used by group listings.
///
/// `end == None` means the window is unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn since(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && self.end.map_or(true, |end| at <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let parsed = parse_event_time("2013-11-28T23:07:40+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2013, 11, 28, 21, 7, 40).unwrap());
    }

    #[test]
    fn test_parse_plain_date_is_midnight_utc() {
        let parsed = parse_event_time("2013-11-30").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2013, 11, 30, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_datetime_is_utc() {
        let parsed = parse_event_time("2013-11-25T10:00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2013, 11, 25, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_event_time("yesterday").is_none());
        assert!(parse_event_time("").is_none());
        assert!(parse_event_time("2013-13-45").is_none());
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2013, 11, 25, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2013, 11, 30, 0, 0, 0).unwrap();
        let range = TimeRange::new(start, Some(end));

        assert!(range.contains(start));
        assert!(range.contains(end));
        assert!(!range.contains(end + chrono::Duration::seconds(1)));
        assert!(!range.contains(start - chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_open_range_has_no_upper_bound() {
        let start = Utc.with_ymd_and_hms(2013, 11, 25, 0, 0, 0).unwrap();
        let range = TimeRange::since(start);

        assert!(range.contains(Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap()));
    }
}
