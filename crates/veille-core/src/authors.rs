use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use veille_parser::{Mention, SentimentCategory};

use crate::sentiment::CategoryCounts;

pub const DEFAULT_TOP_AUTHORS: usize = 10;

/// Sentiment breakdown of one author.
///
/// `counts` only holds the category columns retained by the ranking. `total` counts
/// every mention of the author, out-of-vocabulary labels included, so it can exceed
/// the sum of `counts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSentimentRow {
    pub author: String,
    pub counts: BTreeMap<SentimentCategory, usize>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorRanking {
    /// Known categories with at least one mention among `rows`, in fixed order.
    pub categories: Vec<SentimentCategory>,
    pub rows: Vec<AuthorSentimentRow>,
}

impl AuthorRanking {
    /// Reverses the rows so the lowest-ranked author comes first, matching a
    /// bottom-to-top bar layout.
    pub fn for_display(mut self) -> Self {
        self.rows.reverse();
        self
    }
}

/// Ranks authors by total mentions, descending, keeping the first `limit`.
///
/// Mentions are grouped by author name in ascending order before ranking, and the
/// sort is stable, so equal totals keep that grouped order. The result therefore does
/// not depend on row order. Mentions without an author are not grouped.
pub fn rank_authors_by_sentiment<'a, I>(mentions: I, limit: usize) -> AuthorRanking
where
    I: IntoIterator<Item = &'a Mention>,
{
    let mut groups: BTreeMap<&str, (CategoryCounts, usize)> = BTreeMap::new();
    for mention in mentions {
        let Some(author) = mention.author.as_deref() else {
            continue;
        };
        let (counts, total) = groups.entry(author).or_default();
        if let Some(category) = mention.category() {
            counts.add(category, 1);
        }
        *total += 1;
    }

    let mut ranked: Vec<(&str, CategoryCounts, usize)> = groups
        .into_iter()
        .map(|(author, (counts, total))| (author, counts, total))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2));
    ranked.truncate(limit);

    let categories: Vec<SentimentCategory> = SentimentCategory::ALL
        .iter()
        .copied()
        .filter(|category| ranked.iter().any(|(_, counts, _)| counts.get(*category) > 0))
        .collect();

    let rows = ranked
        .into_iter()
        .map(|(author, counts, total)| AuthorSentimentRow {
            author: author.to_string(),
            counts: categories
                .iter()
                .map(|category| (*category, counts.get(*category)))
                .collect(),
            total,
        })
        .collect();

    AuthorRanking { categories, rows }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorMentions {
    pub author: String,
    pub mentions: usize,
}

/// Plain mention count per author, descending, equal counts in first-appearance order.
pub fn top_authors_by_mentions<'a, I>(mentions: I, limit: usize) -> Vec<AuthorMentions>
where
    I: IntoIterator<Item = &'a Mention>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for author in mentions.into_iter().filter_map(|m| m.author.as_deref()) {
        let count = counts.entry(author).or_insert(0);
        if *count == 0 {
            order.push(author);
        }
        *count += 1;
    }

    let mut ranked: Vec<AuthorMentions> = order
        .into_iter()
        .map(|author| AuthorMentions {
            author: author.to_string(),
            mentions: counts.get(author).copied().unwrap_or(0),
        })
        .collect();
    ranked.sort_by(|a, b| b.mentions.cmp(&a.mentions));
    ranked.truncate(limit);
    ranked
}
