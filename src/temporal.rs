use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};

// `%z` takes both `+01:00` and `+0100`.
static OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y%m%dT%H%M%S%.f%z",
];

// Naive formats seen in AIS exports; all are read as UTC.
static NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%d/%m/%Y %H:%M:%S",
];

/// Parses an ISO-8601 style timestamp. Returns `None` for anything unrecognised.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.with_timezone(&Utc));
    }
    if let Some(t) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    {
        return Some(t.with_timezone(&Utc));
    }

    let naive = value.strip_suffix('Z').unwrap_or(value);
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(naive, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|t| t.and_utc())
}

/// Calendar features of a single timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    pub hour: u32,
    /// Monday = 0 .. Sunday = 6
    pub day_of_week: u32,
    pub month: u32,
}

impl From<&DateTime<Utc>> for Calendar {
    fn from(time: &DateTime<Utc>) -> Self {
        Calendar {
            hour: time.hour(),
            day_of_week: time.weekday().num_days_from_monday(),
            month: time.month(),
        }
    }
}
