use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use veille_parser::Mention;

/// Inclusive calendar-year bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

/// Filter selection for one aggregation pass.
///
/// A record passes when its year lies in `year_range` and, if `authors` is non-empty,
/// its author is one of them. Records without a parseable date have no year and fail
/// any year bound unless `keep_undated` is set; `year_range: None` applies no bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub year_range: Option<YearRange>,
    #[serde(default)]
    pub authors: BTreeSet<String>,
    #[serde(default)]
    pub keep_undated: bool,
}

impl FilterSpec {
    /// No restriction at all; every record passes, undated ones included.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn with_years(mut self, min: i32, max: i32) -> Self {
        self.year_range = Some(YearRange::new(min, max));
        self
    }

    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn keeping_undated(mut self, keep: bool) -> Self {
        self.keep_undated = keep;
        self
    }

    pub fn matches(&self, mention: &Mention) -> bool {
        let year_ok = match (self.year_range, mention.year()) {
            (None, _) => true,
            (Some(range), Some(year)) => range.contains(year),
            (Some(_), None) => self.keep_undated,
        };
        if !year_ok {
            return false;
        }
        if self.authors.is_empty() {
            return true;
        }
        mention
            .author
            .as_deref()
            .is_some_and(|author| self.authors.contains(author))
    }
}

/// Returns the records that pass `filter`, in input order. The input is not modified.
pub fn apply_filters<'a>(mentions: &'a [Mention], filter: &FilterSpec) -> Vec<&'a Mention> {
    mentions
        .iter()
        .filter(|mention| filter.matches(mention))
        .collect()
}

/// Selectable filter domain of a dataset: observed years and distinct authors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub years: Option<YearRange>,
    /// Distinct non-missing authors in first-appearance order.
    pub authors: Vec<String>,
}

impl FilterOptions {
    pub fn from_mentions(mentions: &[Mention]) -> Self {
        let years = mentions
            .iter()
            .filter_map(Mention::year)
            .fold(None, |acc: Option<YearRange>, year| match acc {
                None => Some(YearRange::new(year, year)),
                Some(range) => Some(YearRange::new(range.min.min(year), range.max.max(year))),
            });

        let mut seen = HashSet::new();
        let authors = mentions
            .iter()
            .filter_map(|mention| mention.author.as_deref())
            .filter(|author| seen.insert(*author))
            .map(str::to_string)
            .collect();

        Self { years, authors }
    }

    /// Every observed year and every author selected, the interactive default.
    pub fn full_filter(&self) -> FilterSpec {
        FilterSpec {
            year_range: self.years,
            authors: self.authors.iter().cloned().collect(),
            keep_undated: false,
        }
    }
}
