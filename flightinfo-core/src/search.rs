use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;

use crate::flight::FlightRecord;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DateRangeError {
    #[error("unparseable departure date: {0:?}")]
    Unparseable(String),
    #[error("departure date out of range: {0}")]
    OutOfRange(NaiveDate),
}

/// Text columns that support equality matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Origin,
    Destination,
}

impl TextField {
    pub fn column(self) -> &'static str {
        match self {
            TextField::Origin => "origin",
            TextField::Destination => "destination",
        }
    }

    fn value(self, record: &FlightRecord) -> &str {
        match self {
            TextField::Origin => &record.origin,
            TextField::Destination => &record.destination,
        }
    }
}

/// Timestamp columns that support range matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    DepartTime,
}

impl TimeField {
    pub fn column(self) -> &'static str {
        match self {
            TimeField::DepartTime => "depart_time",
        }
    }

    fn value(self, record: &FlightRecord) -> DateTime<Utc> {
        match self {
            TimeField::DepartTime => record.depart_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals(TextField, String),
    /// Inclusive on both ends.
    Between(TimeField, DateTime<Utc>, DateTime<Utc>),
}

impl Condition {
    pub fn matches(&self, record: &FlightRecord) -> bool {
        match self {
            Condition::Equals(field, expected) => field.value(record) == expected,
            Condition::Between(field, start, end) => {
                let ts = field.value(record);
                *start <= ts && ts <= *end
            }
        }
    }
}

/// Conjunction of conditions applied to stored flights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightFilter {
    conditions: Vec<Condition>,
}

impl FlightFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_location(from: &str, destination: &str) -> Self {
        Self::new()
            .equals(TextField::Origin, from)
            .equals(TextField::Destination, destination)
    }

    pub fn equals(mut self, field: TextField, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::Equals(field, value.into()));
        self
    }

    pub fn between(mut self, field: TimeField, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.conditions.push(Condition::Between(field, start, end));
        self
    }

    pub fn departing_within(self, window: &DayWindow) -> Self {
        self.between(TimeField::DepartTime, window.start, window.end)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, record: &FlightRecord) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

/// One calendar day, from local midnight to 23:59:59.999, expressed in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Build the window for the calendar day, in `local`, that `input` falls on.
    ///
    /// RFC 3339 input is an instant and is converted into `local` first.
    /// Naive date-times and bare dates are already local.
    pub fn containing(input: &str, local: FixedOffset) -> Result<Self, DateRangeError> {
        let date = parse_local_date(input, local)?;
        Self::for_date(date, local)
    }

    pub fn for_date(date: NaiveDate, offset: FixedOffset) -> Result<Self, DateRangeError> {
        let start = date
            .and_hms_opt(0, 0, 0)
            .and_then(|local| to_utc(local, offset))
            .ok_or(DateRangeError::OutOfRange(date))?;
        let end = date
            .and_hms_milli_opt(23, 59, 59, 999)
            .and_then(|local| to_utc(local, offset))
            .ok_or(DateRangeError::OutOfRange(date))?;
        Ok(Self { date, start, end })
    }

    /// Human readable day, e.g. `Wed May 01 2024`.
    pub fn day_label(&self) -> String {
        self.date.format("%a %b %d %Y").to_string()
    }
}

impl fmt::Display for DayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BETWEEN {} AND {}",
            self.start.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            self.end.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
        )
    }
}

fn to_utc(local: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_local_date(input: &str, local: FixedOffset) -> Result<NaiveDate, DateRangeError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&local).date_naive());
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.date());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| DateRangeError::Unparseable(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn record(origin: &str, destination: &str, depart: &str) -> FlightRecord {
        FlightRecord {
            id: Uuid::new_v4(),
            flight_number: "LH400".to_string(),
            airline: "LH".to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            depart_time: depart.parse().unwrap(),
            arrive_time: None,
            seats_available: 10,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_window_for_bare_date() {
        let window = DayWindow::containing("2024-05-01", utc()).unwrap();
        assert_eq!(window.start, "2024-05-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(window.end, "2024-05-01T23:59:59.999Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(window.day_label(), "Wed May 01 2024");
    }

    #[test]
    fn test_window_ignores_time_of_day() {
        let morning = DayWindow::containing("2024-05-01T06:15:00", utc()).unwrap();
        let night = DayWindow::containing("2024-05-01 22:40", utc()).unwrap();
        assert_eq!(morning, night);
    }

    #[test]
    fn test_offset_input_is_converted_to_local_day() {
        // 23:30 at -05:00 is 04:30Z on May 2.
        let window = DayWindow::containing("2024-05-01T23:30:00-05:00", utc()).unwrap();
        assert_eq!(window.date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(window.start, "2024-05-02T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(window.end, "2024-05-02T23:59:59.999Z".parse::<DateTime<Utc>>().unwrap());

        // 23:00Z is 01:00 on May 2 at +02:00.
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let window = DayWindow::containing("2024-05-01T23:00:00Z", plus_two).unwrap();
        assert_eq!(window.date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(window.start, "2024-05-01T22:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(window.end, "2024-05-02T21:59:59.999Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_window_uses_local_offset_for_naive_input() {
        let cet = FixedOffset::east_opt(3600).unwrap();
        let window = DayWindow::containing("2024-05-01", cet).unwrap();
        assert_eq!(window.start, "2024-04-30T23:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let err = DayWindow::containing("next tuesday", utc()).unwrap_err();
        assert_eq!(err, DateRangeError::Unparseable("next tuesday".to_string()));
        assert!(DayWindow::containing("2024-02-30", utc()).is_err());
    }

    #[test]
    fn test_filter_day_boundaries() {
        let window = DayWindow::containing("2024-05-01", utc()).unwrap();
        let filter = FlightFilter::by_location("FRA", "JFK").departing_within(&window);

        assert!(filter.matches(&record("FRA", "JFK", "2024-05-01T00:00:00Z")));
        assert!(filter.matches(&record("FRA", "JFK", "2024-05-01T23:59:59.999Z")));
        assert!(!filter.matches(&record("FRA", "JFK", "2024-05-02T00:00:00Z")));
        assert!(!filter.matches(&record("FRA", "JFK", "2024-04-30T23:59:59.999Z")));
    }

    #[test]
    fn test_filter_requires_every_condition() {
        let filter = FlightFilter::by_location("FRA", "JFK");
        assert_eq!(filter.conditions().len(), 2);
        assert!(filter.matches(&record("FRA", "JFK", "2024-05-01T10:00:00Z")));
        assert!(!filter.matches(&record("FRA", "EWR", "2024-05-01T10:00:00Z")));
        assert!(!filter.matches(&record("MUC", "JFK", "2024-05-01T10:00:00Z")));
    }
}
