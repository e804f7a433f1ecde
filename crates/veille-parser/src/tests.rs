use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, Timelike};

use crate::dates::{parse_created_at, MAX_CREATED_AT, MIN_CREATED_AT};
use crate::errors::ParserError;
use crate::model::{normalize_sentiment, SentimentCategory};
use crate::schema::{detect_delimiter, REQUIRED_COLUMNS};
use crate::{normalize_mentions, normalize_mentions_with, NormalizerOptions};

fn fixture(path: &str) -> Vec<u8> {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

#[test]
fn normalizes_sample_export_without_dropping_rows() {
    let content = fixture("mentions_sample.csv");
    let set = normalize_mentions(&content).expect("sample export should normalize");

    assert_eq!(set.len(), 6);
    assert_eq!(set.source_hash.len(), 64);

    let first = &set.mentions[0];
    assert_eq!(first.author.as_deref(), Some("Le Monde"));
    assert_eq!(first.sentiment, "positive");
    assert_eq!(first.category(), Some(SentimentCategory::Positive));
    assert_eq!(first.year(), Some(2023));

    let third = &set.mentions[2];
    assert_eq!(third.sentiment, "neutral");
    assert!(third.title.is_none());

    let undated = &set.mentions[3];
    assert!(undated.created_at.is_none());
    assert_eq!(undated.category(), Some(SentimentCategory::StronglyPositive));

    let anonymous = &set.mentions[4];
    assert!(anonymous.author.is_none());
    assert_eq!(anonymous.sentiment, "mixed");
    assert!(anonymous.category().is_none());
}

#[test]
fn tallies_data_quality_issues() {
    let content = fixture("mentions_sample.csv");
    let set = normalize_mentions(&content).expect("sample export should normalize");

    assert_eq!(set.quality.undated, 1);
    assert_eq!(set.quality.unknown_sentiment, 1);
    assert_eq!(set.quality.missing_author, 1);
    assert_eq!(set.quality.missing_title, 1);
    assert!(!set.quality.is_clean());
}

#[test]
fn detects_semicolon_delimited_exports() {
    let content = fixture("mentions_semicolon.csv");
    let set = normalize_mentions(&content).expect("semicolon export should normalize");

    assert_eq!(set.len(), 2);
    assert_eq!(set.mentions[1].author.as_deref(), Some("Ouest-France"));
    assert_eq!(set.mentions[1].title.as_deref(), Some("Usine fermée"));
    assert!(set.quality.is_clean());
}

#[test]
fn reports_every_missing_column() {
    let content = fixture("mentions_missing_columns.csv");
    let err = normalize_mentions(&content).expect_err("schema error expected");

    assert!(err.is_schema_error());
    match err {
        ParserError::MissingColumns { missing } => {
            assert_eq!(missing, vec!["sentimentHumanReadable", "articleTitle"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_input_is_a_schema_error() {
    let err = normalize_mentions(b"").expect_err("schema error expected");
    match err {
        ParserError::MissingColumns { missing } => assert_eq!(missing, REQUIRED_COLUMNS),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn header_only_input_yields_empty_set() {
    let content = b"articleCreatedDate,authorName,sentimentHumanReadable,articleTitle\n";
    let set = normalize_mentions(content).expect("header-only export should normalize");
    assert!(set.is_empty());
    assert!(set.quality.is_clean());
}

#[test]
fn short_rows_yield_missing_cells() {
    let content = b"articleCreatedDate,authorName,sentimentHumanReadable,articleTitle\n2023-05-01,Agence\n";
    let set = normalize_mentions(content).expect("short row should normalize");

    assert_eq!(set.len(), 1);
    assert_eq!(set.mentions[0].author.as_deref(), Some("Agence"));
    assert_eq!(set.mentions[0].sentiment, "");
    assert!(set.mentions[0].title.is_none());
}

#[test]
fn strips_byte_order_mark_from_header() {
    let content = "\u{feff}articleCreatedDate,authorName,sentimentHumanReadable,articleTitle\n2023-05-01,A,positive,Titre\n";
    let set = normalize_mentions(content.as_bytes()).expect("BOM header should resolve");
    assert_eq!(set.len(), 1);
}

#[test]
fn explicit_delimiter_overrides_detection() {
    let content = b"articleCreatedDate\tauthorName\tsentimentHumanReadable\tarticleTitle\n2023-05-01\tA, B\tnegative\tTitre\n";
    let options = NormalizerOptions {
        delimiter: Some('\t'),
    };
    let set = normalize_mentions_with(content, &options).expect("tab export should normalize");
    assert_eq!(set.mentions[0].author.as_deref(), Some("A, B"));

    let err = normalize_mentions_with(content, &NormalizerOptions { delimiter: Some('|') })
        .expect_err("pipe is not supported");
    assert!(matches!(err, ParserError::UnsupportedDelimiter('|')));
}

#[test]
fn delimiter_detection_prefers_comma_on_ties() {
    assert_eq!(detect_delimiter("a,b;c"), b',');
    assert_eq!(detect_delimiter("a;b;c,d"), b';');
    assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
    assert_eq!(detect_delimiter("single"), b',');
}

#[test]
fn parses_supported_date_forms() {
    let jan_5 = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();

    let plain = parse_created_at("2023-01-05").expect("plain date");
    assert_eq!(plain.date(), jan_5);

    let with_time = parse_created_at("2023-01-05 09:15:30").expect("date with time");
    assert_eq!(with_time.hour(), 9);

    let rfc3339 = parse_created_at("2023-01-05T23:30:00+02:00").expect("rfc3339");
    assert_eq!(rfc3339.date(), jan_5);
    assert_eq!(rfc3339.hour(), 23);

    let month_first = parse_created_at("01/05/2023").expect("month-first date");
    assert_eq!(month_first.date(), jan_5);

    let slashed = parse_created_at("2023/01/05 10:00").expect("slashed date");
    assert_eq!(slashed.date(), jan_5);

    assert!(parse_created_at("").is_none());
    assert!(parse_created_at("yesterday").is_none());
    assert!(parse_created_at("2023-13-45").is_none());
}

#[test]
fn dates_outside_supported_range_are_unparseable() {
    assert!(parse_created_at("+262142-12-31").is_none());
    assert!(parse_created_at("0001-01-01").is_none());
    assert!(parse_created_at("9999-12-31 23:59:59").is_none());
    assert!(parse_created_at("1677-09-20").is_none());
    assert!(parse_created_at("2262-04-12T00:00:00Z").is_none());

    let first = parse_created_at("1677-09-21").expect("lower bound is accepted");
    assert_eq!(first.date(), MIN_CREATED_AT);
    let last = parse_created_at("2262-04-11 18:00:00").expect("upper bound is accepted");
    assert_eq!(last.date(), MAX_CREATED_AT);
}

#[test]
fn far_future_rows_are_kept_as_undated() {
    let content = b"articleCreatedDate,authorName,sentimentHumanReadable,articleTitle\n\
+262142-12-31,Le Monde,positive,Titre lointain\n\
2023-01-05,Le Monde,negative,Titre proche\n";
    let set = normalize_mentions(content).expect("valid export");

    assert_eq!(set.len(), 2);
    assert!(set.mentions[0].created_at.is_none());
    assert!(set.mentions[1].created_at.is_some());
    assert_eq!(set.quality.undated, 1);
}

#[test]
fn sentiment_categories_keep_fixed_order_and_palette() {
    let labels: Vec<&str> = SentimentCategory::ALL.iter().map(|c| c.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "strongly positive",
            "positive",
            "neutral",
            "negative",
            "strongly negative"
        ]
    );
    for (idx, category) in SentimentCategory::ALL.iter().enumerate() {
        assert_eq!(category.index(), idx);
    }
    assert_eq!(SentimentCategory::Negative.color(), "#2F6690");
    assert_eq!(
        SentimentCategory::parse(&normalize_sentiment("  Strongly Negative ")),
        Some(SentimentCategory::StronglyNegative)
    );
    assert_eq!(SentimentCategory::parse("mixed"), None);

    let json = serde_json::to_string(&SentimentCategory::StronglyPositive).unwrap();
    assert_eq!(json, "\"strongly positive\"");
}
