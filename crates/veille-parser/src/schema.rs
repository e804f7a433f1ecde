use csv::StringRecord;

use crate::errors::ParserError;

pub const CREATED_AT_COLUMN: &str = "articleCreatedDate";
pub const AUTHOR_COLUMN: &str = "authorName";
pub const SENTIMENT_COLUMN: &str = "sentimentHumanReadable";
pub const TITLE_COLUMN: &str = "articleTitle";

pub const REQUIRED_COLUMNS: [&str; 4] = [
    CREATED_AT_COLUMN,
    AUTHOR_COLUMN,
    SENTIMENT_COLUMN,
    TITLE_COLUMN,
];

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub created_at: usize,
    pub author: usize,
    pub sentiment: usize,
    pub title: usize,
}

impl ColumnIndex {
    pub fn resolve(header: &StringRecord) -> Result<Self, ParserError> {
        let names: Vec<&str> = header
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').trim())
            .collect();
        let position = |column: &str| names.iter().position(|name| *name == column);

        let created_at = position(CREATED_AT_COLUMN);
        let author = position(AUTHOR_COLUMN);
        let sentiment = position(SENTIMENT_COLUMN);
        let title = position(TITLE_COLUMN);

        match (created_at, author, sentiment, title) {
            (Some(created_at), Some(author), Some(sentiment), Some(title)) => Ok(Self {
                created_at,
                author,
                sentiment,
                title,
            }),
            _ => {
                let missing = REQUIRED_COLUMNS
                    .iter()
                    .zip([created_at, author, sentiment, title])
                    .filter(|(_, found)| found.is_none())
                    .map(|(column, _)| *column)
                    .collect();
                Err(ParserError::MissingColumns { missing })
            }
        }
    }
}

/// Picks the delimiter that occurs most often in the header line. Comma wins ties.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let candidates = [b',', b';', b'\t'];
    let mut best = b',';
    let mut best_count = 0;
    for candidate in candidates {
        let count = header_line.bytes().filter(|b| *b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}
