use chrono::{DateTime, NaiveDate, NaiveDateTime};

static NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

static OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%z",
];

static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Earliest and latest accepted calendar dates; anything outside is treated as unparseable.
pub const MIN_CREATED_AT: NaiveDate = match NaiveDate::from_ymd_opt(1677, 9, 21) {
    Some(date) => date,
    None => NaiveDate::MIN,
};
pub const MAX_CREATED_AT: NaiveDate = match NaiveDate::from_ymd_opt(2262, 4, 11) {
    Some(date) => date,
    None => NaiveDate::MAX,
};

/// Parses a creation timestamp. Values carrying a UTC offset keep their wall-clock time
/// and drop the offset. Returns `None` for anything unrecognised or outside
/// [`MIN_CREATED_AT`]..=[`MAX_CREATED_AT`]; a bad date is a per-row data-quality issue,
/// not an error.
pub fn parse_created_at(value: &str) -> Option<NaiveDateTime> {
    parse_any(value).filter(|dt| (MIN_CREATED_AT..=MAX_CREATED_AT).contains(&dt.date()))
}

fn parse_any(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}
