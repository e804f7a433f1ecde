use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use veille_parser::{Mention, SentimentCategory};

/// Headline counts. `positive`, `negative` and `neutral` are exact label matches; the
/// "strongly" labels are not folded into them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentKpis {
    pub total_mentions: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: SentimentCategory,
    pub count: usize,
}

/// Counts for all five categories in fixed order, zero-filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts([usize; 5]);

impl CategoryCounts {
    pub fn get(&self, category: SentimentCategory) -> usize {
        self.0[category.index()]
    }

    pub fn add(&mut self, category: SentimentCategory, count: usize) {
        self.0[category.index()] += count;
    }

    pub fn sum(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = CategoryCount> + '_ {
        SentimentCategory::ALL
            .iter()
            .map(|category| CategoryCount {
                category: *category,
                count: self.get(*category),
            })
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for CategoryCounts {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<CategoryCount>::deserialize(deserializer)?;
        let mut counts = CategoryCounts::default();
        for entry in entries {
            counts.add(entry.category, entry.count);
        }
        Ok(counts)
    }
}

/// Occurrences of every distinct normalized label, in first-seen order.
pub fn raw_sentiment_counts<'a, I>(mentions: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a Mention>,
{
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for mention in mentions {
        let entry = counts.entry(mention.sentiment.as_str()).or_insert(0);
        if *entry == 0 {
            order.push(mention.sentiment.clone());
        }
        *entry += 1;
    }
    order
        .into_iter()
        .map(|label| {
            let count = counts.get(label.as_str()).copied().unwrap_or(0);
            (label, count)
        })
        .collect()
}

/// Projects the raw label counts onto the five known categories. Labels outside the
/// vocabulary are left out of the projection.
pub fn sentiment_distribution<'a, I>(mentions: I) -> CategoryCounts
where
    I: IntoIterator<Item = &'a Mention>,
{
    let mut distribution = CategoryCounts::default();
    for (label, count) in raw_sentiment_counts(mentions) {
        if let Some(category) = SentimentCategory::parse(&label) {
            distribution.add(category, count);
        }
    }
    distribution
}

/// `total_mentions` counts every record, including those with out-of-vocabulary labels.
pub fn sentiment_kpis(mentions: &[&Mention]) -> SentimentKpis {
    let distribution = sentiment_distribution(mentions.iter().copied());
    SentimentKpis {
        total_mentions: mentions.len(),
        positive: distribution.get(SentimentCategory::Positive),
        negative: distribution.get(SentimentCategory::Negative),
        neutral: distribution.get(SentimentCategory::Neutral),
    }
}
