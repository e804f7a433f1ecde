use blake3::Hasher;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::dates::parse_created_at;
use crate::errors::ParserError;
use crate::model::{Mention, MentionSet};
use crate::schema::{detect_delimiter, ColumnIndex};

#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizerOptions {
    /// Field delimiter; detected from the header line when `None`.
    pub delimiter: Option<char>,
}

pub fn normalize_mentions(content: &[u8]) -> Result<MentionSet, ParserError> {
    normalize_mentions_with(content, &NormalizerOptions::default())
}

/// Parses a delimited export into the canonical record set. Every data row becomes a
/// [`Mention`]; only a missing required column aborts.
pub fn normalize_mentions_with(
    content: &[u8],
    options: &NormalizerOptions,
) -> Result<MentionSet, ParserError> {
    let delimiter = match options.delimiter {
        Some(ch @ (',' | ';' | '\t')) => ch as u8,
        Some(other) => return Err(ParserError::UnsupportedDelimiter(other)),
        None => detect_delimiter(&first_line(content)),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content);

    let mut records = reader.records();
    let header = match records.next() {
        Some(header) => header?,
        None => StringRecord::new(),
    };
    let columns = ColumnIndex::resolve(&header)?;

    let mut mentions = Vec::new();
    for record in records {
        let record = record?;
        mentions.push(Mention::new(
            record.get(columns.created_at).and_then(parse_created_at),
            non_empty(record.get(columns.author)),
            record.get(columns.sentiment).unwrap_or_default(),
            non_empty(record.get(columns.title)),
        ));
    }

    let set = MentionSet::from_mentions(compute_hash(content), mentions);
    debug!(
        rows = set.len(),
        delimiter = %(delimiter as char).escape_default(),
        "normalized mention export"
    );
    if !set.quality.is_clean() {
        warn!(
            undated = set.quality.undated,
            unknown_sentiment = set.quality.unknown_sentiment,
            missing_author = set.quality.missing_author,
            missing_title = set.quality.missing_title,
            "mention export has data-quality issues; affected rows are kept"
        );
    }
    Ok(set)
}

fn first_line(content: &[u8]) -> String {
    let end = content
        .iter()
        .position(|b| *b == b'\n')
        .unwrap_or(content.len());
    String::from_utf8_lossy(&content[..end]).into_owned()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn compute_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    hasher.finalize().to_hex().to_string()
}
