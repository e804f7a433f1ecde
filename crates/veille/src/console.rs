use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use veille_core::pipelines::MentionReport;

fn base_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn count_cell(count: usize) -> Cell {
    Cell::new(count).set_alignment(CellAlignment::Right)
}

pub fn kpi_table(report: &MentionReport) -> Table {
    let kpis = &report.kpis;
    let mut table = base_table(vec![
        "Total mentions".into(),
        "Positive".into(),
        "Negative".into(),
        "Neutral".into(),
    ]);
    table.add_row(vec![
        count_cell(kpis.total_mentions),
        count_cell(kpis.positive),
        count_cell(kpis.negative),
        count_cell(kpis.neutral),
    ]);
    table
}

pub fn timeline_table(report: &MentionReport) -> Table {
    let mut table = base_table(vec![
        format!("Period ({})", report.granularity),
        "Mentions".into(),
    ]);
    for point in &report.timeline {
        table.add_row(vec![Cell::new(&point.period_label), count_cell(point.count)]);
    }
    table
}

pub fn distribution_table(report: &MentionReport) -> Table {
    let mut table = base_table(vec!["Sentiment".into(), "Mentions".into()]);
    for entry in report.distribution.iter() {
        table.add_row(vec![Cell::new(entry.category), count_cell(entry.count)]);
    }
    table
}

/// Author breakdown, highest-ranked author on the first row.
pub fn author_table(report: &MentionReport) -> Table {
    let ranking = &report.top_authors;
    let mut header = vec!["Author".to_string()];
    header.extend(ranking.categories.iter().map(|category| category.to_string()));
    header.push("Total".into());

    let mut table = base_table(header);
    for row in ranking.rows.iter().rev() {
        let mut cells = vec![Cell::new(&row.author)];
        cells.extend(
            ranking
                .categories
                .iter()
                .map(|category| count_cell(row.counts.get(category).copied().unwrap_or(0))),
        );
        cells.push(count_cell(row.total));
        table.add_row(cells);
    }
    table
}

pub fn keyword_table(report: &MentionReport) -> Table {
    let mut table = base_table(vec!["Keyword".into(), "Occurrences".into()]);
    for keyword in &report.keywords {
        table.add_row(vec![Cell::new(&keyword.token), count_cell(keyword.count)]);
    }
    table
}

pub fn author_mentions_table(report: &MentionReport) -> Table {
    let mut table = base_table(vec!["Author".into(), "Mentions".into()]);
    for entry in &report.author_mentions {
        table.add_row(vec![Cell::new(&entry.author), count_cell(entry.mentions)]);
    }
    table
}

/// Renders every section of the report as titled terminal tables.
pub fn render_report(report: &MentionReport) -> String {
    let sections = [
        ("Key figures", kpi_table(report)),
        ("Mentions over time", timeline_table(report)),
        ("Sentiment distribution", distribution_table(report)),
        ("Top authors by sentiment", author_table(report)),
        ("Top keywords", keyword_table(report)),
        ("Most active authors", author_mentions_table(report)),
    ];

    let mut out = format!("Source {}\n", report.source_hash);
    for (title, table) in sections {
        out.push('\n');
        out.push_str(title);
        out.push('\n');
        out.push_str(&table.to_string());
        out.push('\n');
    }
    out
}
