use std::fmt::Write;

use html_escape::encode_text;
use veille_core::pipelines::MentionReport;
use veille_parser::SentimentCategory;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#16425B}\
table{border-collapse:collapse;margin-bottom:1.5rem}\
th,td{border:1px solid #D9DCD6;padding:.3rem .6rem;text-align:left}\
td.count{text-align:right}\
.kpis{display:flex;gap:1rem;margin-bottom:1.5rem}\
.kpi{border:1px solid #D9DCD6;padding:.6rem 1rem}\
.kpi strong{display:block;font-size:1.6rem}\
.swatch{display:inline-block;width:.8rem;height:.8rem;margin-right:.4rem}";

fn swatch(category: SentimentCategory) -> String {
    format!(
        "<span class=\"swatch\" style=\"background:{}\"></span>{}",
        category.color(),
        encode_text(category.as_str())
    )
}

fn push_kpis(out: &mut String, report: &MentionReport) {
    let kpis = &report.kpis;
    out.push_str("<section class=\"kpis\">");
    for (label, value) in [
        ("Total mentions", kpis.total_mentions),
        ("Positive", kpis.positive),
        ("Negative", kpis.negative),
        ("Neutral", kpis.neutral),
    ] {
        let _ = write!(out, "<div class=\"kpi\"><strong>{value}</strong>{label}</div>");
    }
    out.push_str("</section>");
}

fn push_timeline(out: &mut String, report: &MentionReport) {
    let _ = write!(
        out,
        "<h2>Mentions over time</h2><table><tr><th>Period ({})</th><th>Mentions</th></tr>",
        report.granularity
    );
    for point in &report.timeline {
        let _ = write!(
            out,
            "<tr><td>{}</td><td class=\"count\">{}</td></tr>",
            encode_text(&point.period_label),
            point.count
        );
    }
    out.push_str("</table>");
}

fn push_distribution(out: &mut String, report: &MentionReport) {
    out.push_str("<h2>Sentiment distribution</h2><table><tr><th>Sentiment</th><th>Mentions</th></tr>");
    for entry in report.distribution.iter() {
        let _ = write!(
            out,
            "<tr><td>{}</td><td class=\"count\">{}</td></tr>",
            swatch(entry.category),
            entry.count
        );
    }
    out.push_str("</table>");
}

fn push_authors(out: &mut String, report: &MentionReport) {
    let ranking = &report.top_authors;
    out.push_str("<h2>Top authors by sentiment</h2><table><tr><th>Author</th>");
    for category in &ranking.categories {
        let _ = write!(out, "<th>{}</th>", swatch(*category));
    }
    out.push_str("<th>Total</th></tr>");
    for row in ranking.rows.iter().rev() {
        let _ = write!(out, "<tr><td>{}</td>", encode_text(&row.author));
        for category in &ranking.categories {
            let count = row.counts.get(category).copied().unwrap_or(0);
            let _ = write!(out, "<td class=\"count\">{count}</td>");
        }
        let _ = write!(out, "<td class=\"count\">{}</td></tr>", row.total);
    }
    out.push_str("</table>");
}

fn push_keywords(out: &mut String, report: &MentionReport) {
    out.push_str("<h2>Top keywords</h2><table><tr><th>Keyword</th><th>Occurrences</th></tr>");
    for keyword in &report.keywords {
        let _ = write!(
            out,
            "<tr><td>{}</td><td class=\"count\">{}</td></tr>",
            encode_text(&keyword.token),
            keyword.count
        );
    }
    out.push_str("</table>");
}

fn push_author_mentions(out: &mut String, report: &MentionReport) {
    out.push_str("<h2>Most active authors</h2><table><tr><th>Author</th><th>Mentions</th></tr>");
    for entry in &report.author_mentions {
        let _ = write!(
            out,
            "<tr><td>{}</td><td class=\"count\">{}</td></tr>",
            encode_text(&entry.author),
            entry.mentions
        );
    }
    out.push_str("</table>");
}

/// Self-contained HTML document for one report. Every dataset-derived string is escaped.
pub fn render_report_html(report: &MentionReport) -> String {
    let mut out = String::with_capacity(8 * 1024);
    out.push_str("<!DOCTYPE html><html lang=\"fr\"><head><meta charset=\"utf-8\">");
    out.push_str("<title>Media monitoring report</title><style>");
    out.push_str(STYLE);
    out.push_str("</style></head><body><h1>Media monitoring report</h1>");
    let _ = write!(
        out,
        "<p>Source <code>{}</code></p>",
        encode_text(&report.source_hash)
    );

    push_kpis(&mut out, report);
    push_timeline(&mut out, report);
    push_distribution(&mut out, report);
    push_authors(&mut out, report);
    push_keywords(&mut out, report);
    push_author_mentions(&mut out, report);

    out.push_str("</body></html>");
    out
}
