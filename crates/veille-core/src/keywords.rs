use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use veille_parser::Mention;

pub const DEFAULT_TOP_KEYWORDS: usize = 15;

/// Alphabetic runs of at least four letters, so the stopword list only holds words of
/// that length.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\p{Alphabetic}{4,}\b").expect("token pattern is valid"));

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "alors", "après", "aussi", "autre", "autres", "avant", "avec", "avoir", "cela", "celle",
        "celui", "cependant", "ceci", "cette", "ceux", "chaque", "comme", "comment", "dans",
        "depuis", "donc", "dont", "elle", "elles", "encore", "entre", "être", "fait", "faire",
        "leur", "leurs", "lors", "mais", "même", "mêmes", "moins", "nous", "notre",
        "parce", "pendant", "peut", "plus", "pour", "pourquoi", "quand", "quel", "quelle",
        "quelles", "quels", "sans", "selon", "sera", "seront", "sont", "sous", "suis", "tous",
        "tout", "toute", "toutes", "très", "vers", "votre", "vous", "était", "étaient", "ainsi",
    ]
    .into_iter()
    .collect()
});

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub token: String,
    pub count: usize,
    /// Display label, `"token (count)"`.
    pub label: String,
}

impl KeywordCount {
    pub fn new(token: impl Into<String>, count: usize) -> Self {
        let token = token.into();
        let label = format!("{token} ({count})");
        Self {
            token,
            count,
            label,
        }
    }
}

/// Lowercased tokens of one text, stopwords removed, in reading order.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}

/// Most frequent title tokens, descending; equal counts keep first-occurrence order.
/// Mentions without a title are skipped.
pub fn extract_keywords<'a, I>(mentions: I, limit: usize) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = &'a Mention>,
{
    let corpus = mentions
        .into_iter()
        .filter_map(|mention| mention.title.as_deref())
        .collect::<Vec<_>>()
        .join(" ");

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in tokenize(&corpus) {
        match counts.get_mut(&token) {
            Some(count) => *count += 1,
            None => {
                counts.insert(token.clone(), 1);
                order.push(token);
            }
        }
    }

    let mut ranked: Vec<KeywordCount> = order
        .into_iter()
        .map(|token| {
            let count = counts.get(&token).copied().unwrap_or(0);
            KeywordCount::new(token, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}
