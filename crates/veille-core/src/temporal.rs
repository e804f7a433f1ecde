use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;
use veille_parser::Mention;

/// Upper bound on the number of periods a zero-filled series may hold.
pub const DEFAULT_MAX_PERIODS: usize = 5_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }

    /// First day of the period containing `date`. Weeks start on Monday.
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => date
                .checked_sub_signed(Duration::days(i64::from(
                    date.weekday().num_days_from_monday(),
                )))
                .unwrap_or(NaiveDate::MIN),
            Granularity::Month => date.with_day(1).unwrap_or(date),
            Granularity::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    /// Start of the period following the one starting at `start`.
    pub fn next_start(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Day => start.checked_add_signed(Duration::days(1)),
            Granularity::Week => start.checked_add_signed(Duration::days(7)),
            Granularity::Month => start.checked_add_months(Months::new(1)),
            Granularity::Year => start.checked_add_months(Months::new(12)),
        }
    }

    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            Granularity::Day => start.format("%Y-%m-%d").to_string(),
            Granularity::Week => {
                let end = start
                    .checked_add_signed(Duration::days(6))
                    .unwrap_or(NaiveDate::MAX);
                format!("{}/{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }
            Granularity::Month => start.format("%Y-%m").to_string(),
            Granularity::Year => start.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" | "d" | "daily" => Ok(Granularity::Day),
            "week" | "w" | "weekly" => Ok(Granularity::Week),
            "month" | "m" | "monthly" => Ok(Granularity::Month),
            "year" | "y" | "yearly" => Ok(Granularity::Year),
            other => Err(format!(
                "unknown granularity '{other}' (expected day, week, month or year)"
            )),
        }
    }
}

/// Whether periods with no observed mention are synthesized inside the observed span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    #[default]
    Observed,
    ZeroFill,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCount {
    pub period_start: NaiveDate,
    pub period_label: String,
    pub count: usize,
}

/// Counts dated mentions per period, ascending by period start. Undated mentions are
/// skipped. Zero-filling is capped at [`DEFAULT_MAX_PERIODS`].
pub fn mentions_over_time<'a, I>(
    mentions: I,
    granularity: Granularity,
    gaps: GapPolicy,
) -> Vec<PeriodCount>
where
    I: IntoIterator<Item = &'a Mention>,
{
    mentions_over_time_capped(mentions, granularity, gaps, DEFAULT_MAX_PERIODS)
}

/// Like [`mentions_over_time`], with an explicit cap on zero-filled periods. When the
/// observed span would need more than `max_periods` periods the series falls back to
/// observed periods only.
pub fn mentions_over_time_capped<'a, I>(
    mentions: I,
    granularity: Granularity,
    gaps: GapPolicy,
    max_periods: usize,
) -> Vec<PeriodCount>
where
    I: IntoIterator<Item = &'a Mention>,
{
    let mut buckets: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for created_at in mentions.into_iter().filter_map(|m| m.created_at) {
        *buckets
            .entry(granularity.period_start(created_at.date()))
            .or_insert(0) += 1;
    }

    if gaps == GapPolicy::ZeroFill {
        fill_gaps(&mut buckets, granularity, max_periods);
    }

    buckets
        .into_iter()
        .map(|(start, count)| PeriodCount {
            period_start: start,
            period_label: granularity.label(start),
            count,
        })
        .collect()
}

fn fill_gaps(
    buckets: &mut BTreeMap<NaiveDate, usize>,
    granularity: Granularity,
    max_periods: usize,
) {
    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return;
    };

    let mut starts = Vec::new();
    let mut cursor = granularity.next_start(first);
    while let Some(start) = cursor.filter(|start| *start < last) {
        if !buckets.contains_key(&start) {
            starts.push(start);
        }
        if buckets.len() + starts.len() > max_periods {
            warn!(
                granularity = %granularity,
                first = %first,
                last = %last,
                max_periods,
                "zero-fill span exceeds period cap; keeping observed periods only"
            );
            return;
        }
        cursor = granularity.next_start(start);
    }

    for start in starts {
        buckets.insert(start, 0);
    }
}
