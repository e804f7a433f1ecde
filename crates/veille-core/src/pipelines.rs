use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use veille_parser::{normalize_mentions, Mention, MentionSet};

use crate::{
    authors::{
        rank_authors_by_sentiment, top_authors_by_mentions, AuthorMentions, AuthorRanking,
        DEFAULT_TOP_AUTHORS,
    },
    error::Result,
    filters::{apply_filters, FilterOptions, FilterSpec},
    keywords::{extract_keywords, KeywordCount, DEFAULT_TOP_KEYWORDS},
    sentiment::{sentiment_distribution, sentiment_kpis, CategoryCounts, SentimentKpis},
    temporal::{
        mentions_over_time_capped, GapPolicy, Granularity, PeriodCount, DEFAULT_MAX_PERIODS,
    },
};

/// Presentation knobs of one aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub granularity: Granularity,
    pub gap_policy: GapPolicy,
    pub top_authors: usize,
    pub top_keywords: usize,
    /// Cap on zero-filled periods; wider spans fall back to observed periods.
    pub max_periods: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::Month,
            gap_policy: GapPolicy::Observed,
            top_authors: DEFAULT_TOP_AUTHORS,
            top_keywords: DEFAULT_TOP_KEYWORDS,
            max_periods: DEFAULT_MAX_PERIODS,
        }
    }
}

/// Everything the presentation layer consumes for one dataset and filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionReport {
    pub source_hash: String,
    pub filter: FilterSpec,
    pub kpis: SentimentKpis,
    pub granularity: Granularity,
    pub timeline: Vec<PeriodCount>,
    pub distribution: CategoryCounts,
    /// Top authors by sentiment breakdown, lowest-ranked first.
    pub top_authors: AuthorRanking,
    pub keywords: Vec<KeywordCount>,
    /// Top authors by raw mention count, highest first.
    pub author_mentions: Vec<AuthorMentions>,
}

/// Runs the filter and the four aggregators over one record set. Pure: the same
/// inputs always produce the same report.
pub fn build_report(
    dataset: &MentionSet,
    filter: &FilterSpec,
    options: &ReportOptions,
) -> MentionReport {
    let filtered = apply_filters(&dataset.mentions, filter);
    debug!(
        input_rows = dataset.len(),
        filtered_rows = filtered.len(),
        "applied mention filters"
    );
    let report = aggregate(&dataset.source_hash, filter, &filtered, options);
    info!(
        source_hash = %dataset.source_hash,
        total_mentions = report.kpis.total_mentions,
        periods = report.timeline.len(),
        authors = report.top_authors.rows.len(),
        keywords = report.keywords.len(),
        "built mention report"
    );
    report
}

fn aggregate(
    source_hash: &str,
    filter: &FilterSpec,
    filtered: &[&Mention],
    options: &ReportOptions,
) -> MentionReport {
    let records = || filtered.iter().copied();

    let kpis = sentiment_kpis(filtered);
    let timeline = mentions_over_time_capped(
        records(),
        options.granularity,
        options.gap_policy,
        options.max_periods,
    );
    debug!(granularity = %options.granularity, periods = timeline.len(), "bucketed mentions");
    let distribution = sentiment_distribution(records());
    let top_authors = rank_authors_by_sentiment(records(), options.top_authors).for_display();
    let keywords = extract_keywords(records(), options.top_keywords);
    debug!(keywords = keywords.len(), "extracted title keywords");
    let author_mentions = top_authors_by_mentions(records(), options.top_authors);

    MentionReport {
        source_hash: source_hash.to_string(),
        filter: filter.clone(),
        kpis,
        granularity: options.granularity,
        timeline,
        distribution,
        top_authors,
        keywords,
        author_mentions,
    }
}

/// Holds one normalized dataset across successive filter choices. The record set and
/// its filter domain are computed once; every report is rebuilt from them.
#[derive(Debug, Clone)]
pub struct ReportSession {
    dataset: Arc<MentionSet>,
    options: FilterOptions,
}

impl ReportSession {
    pub fn new(dataset: MentionSet) -> Self {
        let options = FilterOptions::from_mentions(&dataset.mentions);
        Self {
            dataset: Arc::new(dataset),
            options,
        }
    }

    /// Normalizes a raw export and opens a session on it.
    pub fn from_bytes(content: &[u8]) -> Result<Self> {
        Ok(Self::new(normalize_mentions(content)?))
    }

    pub fn dataset(&self) -> &MentionSet {
        &self.dataset
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    /// Every observed year and author selected.
    pub fn default_filter(&self) -> FilterSpec {
        self.options.full_filter()
    }

    pub fn report(&self, filter: &FilterSpec, options: &ReportOptions) -> MentionReport {
        build_report(&self.dataset, filter, options)
    }
}
