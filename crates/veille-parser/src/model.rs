use std::fmt;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The five sentiment labels used for every distribution, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    #[serde(rename = "strongly positive")]
    StronglyPositive,
    Positive,
    Neutral,
    Negative,
    #[serde(rename = "strongly negative")]
    StronglyNegative,
}

impl SentimentCategory {
    pub const ALL: [SentimentCategory; 5] = [
        SentimentCategory::StronglyPositive,
        SentimentCategory::Positive,
        SentimentCategory::Neutral,
        SentimentCategory::Negative,
        SentimentCategory::StronglyNegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::StronglyPositive => "strongly positive",
            SentimentCategory::Positive => "positive",
            SentimentCategory::Neutral => "neutral",
            SentimentCategory::Negative => "negative",
            SentimentCategory::StronglyNegative => "strongly negative",
        }
    }

    /// Position within [`SentimentCategory::ALL`].
    pub fn index(&self) -> usize {
        match self {
            SentimentCategory::StronglyPositive => 0,
            SentimentCategory::Positive => 1,
            SentimentCategory::Neutral => 2,
            SentimentCategory::Negative => 3,
            SentimentCategory::StronglyNegative => 4,
        }
    }

    /// Chart color paired with the category.
    pub fn color(&self) -> &'static str {
        match self {
            SentimentCategory::StronglyPositive => "#81C3D7",
            SentimentCategory::Positive => "#219ebc",
            SentimentCategory::Neutral => "#D9DCD6",
            SentimentCategory::Negative => "#2F6690",
            SentimentCategory::StronglyNegative => "#16425B",
        }
    }

    /// Matches an already-normalized label. Out-of-vocabulary labels yield `None`.
    pub fn parse(normalized: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn normalize_sentiment(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One media mention, validated once at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub created_at: Option<NaiveDateTime>,
    pub author: Option<String>,
    /// Trimmed, lowercased label. May fall outside the five known categories.
    pub sentiment: String,
    pub title: Option<String>,
}

impl Mention {
    pub fn new(
        created_at: Option<NaiveDateTime>,
        author: Option<&str>,
        sentiment: &str,
        title: Option<&str>,
    ) -> Self {
        Self {
            created_at,
            author: author.map(str::to_string),
            sentiment: normalize_sentiment(sentiment),
            title: title.map(str::to_string),
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.created_at.map(|dt| dt.year())
    }

    pub fn category(&self) -> Option<SentimentCategory> {
        SentimentCategory::parse(&self.sentiment)
    }
}

/// Row-level data-quality tally. Rows are never rejected for these reasons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuality {
    pub undated: usize,
    pub unknown_sentiment: usize,
    pub missing_author: usize,
    pub missing_title: usize,
}

impl DataQuality {
    pub fn observe(&mut self, mention: &Mention) {
        if mention.created_at.is_none() {
            self.undated += 1;
        }
        if mention.category().is_none() {
            self.unknown_sentiment += 1;
        }
        if mention.author.is_none() {
            self.missing_author += 1;
        }
        if mention.title.is_none() {
            self.missing_title += 1;
        }
    }

    pub fn is_clean(&self) -> bool {
        *self == DataQuality::default()
    }
}

/// The normalized record set of one uploaded dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MentionSet {
    pub source_hash: String,
    pub mentions: Vec<Mention>,
    pub quality: DataQuality,
}

impl MentionSet {
    pub fn from_mentions(source_hash: impl Into<String>, mentions: Vec<Mention>) -> Self {
        let mut quality = DataQuality::default();
        for mention in &mentions {
            quality.observe(mention);
        }
        Self {
            source_hash: source_hash.into(),
            mentions,
            quality,
        }
    }

    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }
}
