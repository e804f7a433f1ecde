use std::fs::File;
use std::path::{Path, PathBuf};

use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use tracing::info;
use veille_parser::Mention;

use crate::error::Result;
use crate::pipelines::MentionReport;

/// Columnar views of a report, one frame per output series.
#[derive(Debug, Clone)]
pub struct ReportFrames {
    pub timeline: DataFrame,
    pub sentiment: DataFrame,
    pub authors: DataFrame,
    pub keywords: DataFrame,
    pub author_mentions: DataFrame,
}

impl ReportFrames {
    pub fn from_report(report: &MentionReport) -> Result<Self> {
        let timeline = DataFrame::new(vec![
            Series::new(
                "period_start".into(),
                report
                    .timeline
                    .iter()
                    .map(|p| p.period_start.format("%Y-%m-%d").to_string())
                    .collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "period_label".into(),
                report
                    .timeline
                    .iter()
                    .map(|p| p.period_label.as_str())
                    .collect::<Vec<_>>(),
            )
            .into(),
            count_series("count", report.timeline.iter().map(|p| p.count)).into(),
        ])?;

        let sentiment = DataFrame::new(vec![
            Series::new(
                "category".into(),
                report
                    .distribution
                    .iter()
                    .map(|entry| entry.category.as_str())
                    .collect::<Vec<_>>(),
            )
            .into(),
            count_series("count", report.distribution.iter().map(|entry| entry.count)).into(),
        ])?;

        let rows = &report.top_authors.rows;
        let mut author_columns: Vec<Column> = vec![Series::new(
            "author".into(),
            rows.iter().map(|row| row.author.as_str()).collect::<Vec<_>>(),
        )
        .into()];
        for category in &report.top_authors.categories {
            author_columns.push(
                count_series(
                    category.as_str(),
                    rows.iter()
                        .map(|row| row.counts.get(category).copied().unwrap_or(0)),
                )
                .into(),
            );
        }
        author_columns.push(count_series("total", rows.iter().map(|row| row.total)).into());
        let authors = DataFrame::new(author_columns)?;

        let keywords = DataFrame::new(vec![
            Series::new(
                "token".into(),
                report
                    .keywords
                    .iter()
                    .map(|k| k.token.as_str())
                    .collect::<Vec<_>>(),
            )
            .into(),
            count_series("count", report.keywords.iter().map(|k| k.count)).into(),
        ])?;

        let author_mentions = DataFrame::new(vec![
            Series::new(
                "author".into(),
                report
                    .author_mentions
                    .iter()
                    .map(|a| a.author.as_str())
                    .collect::<Vec<_>>(),
            )
            .into(),
            count_series("mentions", report.author_mentions.iter().map(|a| a.mentions)).into(),
        ])?;

        Ok(Self {
            timeline,
            sentiment,
            authors,
            keywords,
            author_mentions,
        })
    }

    fn named(&self) -> [(&'static str, &DataFrame); 5] {
        [
            ("timeline", &self.timeline),
            ("sentiment", &self.sentiment),
            ("authors", &self.authors),
            ("keywords", &self.keywords),
            ("author_mentions", &self.author_mentions),
        ]
    }

    /// Writes every frame to `<dir>/<name>.parquet` and returns the written paths.
    pub fn write_parquet_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for (name, frame) in self.named() {
            let path = dir.join(format!("{name}.parquet"));
            write_parquet(&path, frame)?;
            written.push(path);
        }
        info!(dir = %dir.display(), files = written.len(), "exported report frames");
        Ok(written)
    }
}

/// One row per mention, dates rendered as `YYYY-MM-DD HH:MM:SS`.
pub fn mentions_frame(mentions: &[&Mention]) -> Result<DataFrame> {
    let created_at: Vec<Option<String>> = mentions
        .iter()
        .map(|m| m.created_at.map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()))
        .collect();
    let df = DataFrame::new(vec![
        Series::new("created_at".into(), created_at).into(),
        Series::new(
            "author".into(),
            mentions
                .iter()
                .map(|m| m.author.as_deref())
                .collect::<Vec<Option<&str>>>(),
        )
        .into(),
        Series::new(
            "sentiment".into(),
            mentions
                .iter()
                .map(|m| m.sentiment.as_str())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "title".into(),
            mentions
                .iter()
                .map(|m| m.title.as_deref())
                .collect::<Vec<Option<&str>>>(),
        )
        .into(),
    ])?;
    Ok(df)
}

pub fn write_parquet(path: &Path, frame: &DataFrame) -> Result<()> {
    let mut file = File::create(path)?;
    let mut clone = frame.clone();
    ParquetWriter::new(&mut file)
        .with_compression(ParquetCompression::Zstd(None))
        .with_statistics(StatisticsOptions::default())
        .finish(&mut clone)?;
    Ok(())
}

fn count_series(name: &str, counts: impl Iterator<Item = usize>) -> Series {
    Series::new(
        name.into(),
        counts.map(|count| count as i64).collect::<Vec<_>>(),
    )
}
