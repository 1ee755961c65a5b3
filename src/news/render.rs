use super::format::{format_date, summarize};
use super::model::Article;
use crate::util::sanitize::sanitize_for_terminal;
use console::style;
use std::io::{self, Write};

pub const SUMMARY_WIDTH: usize = 80;
const RULE_WIDTH: usize = 80;
const FIELD_CAP: usize = 300;

/// One article shaped for display. `id` is the 1-based position in the
/// result set and stays stable for as long as that result set is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    pub id: usize,
    pub title: String,
    pub source: String,
    pub published: String,
    pub summary: String,
    pub url: Option<String>,
}

// Sanitized, then shortened on a word boundary with a visible `...`.
fn display_field(text: &str) -> String {
    let clean = sanitize_for_terminal(text, usize::MAX);
    if clean.is_empty() {
        clean
    } else {
        summarize(Some(&clean), FIELD_CAP)
    }
}

impl DisplayRecord {
    pub fn from_article(id: usize, article: &Article) -> Self {
        let title = article
            .title
            .as_deref()
            .map(display_field)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "(untitled)".into());
        let description = article
            .description
            .as_deref()
            .map(|d| sanitize_for_terminal(d, usize::MAX));
        // never shortened: a cut link would open the wrong page
        let url = article
            .url
            .as_deref()
            .map(|u| sanitize_for_terminal(u, usize::MAX))
            .filter(|u| !u.is_empty());

        Self {
            id,
            title,
            source: display_field(article.source_name()),
            published: format_date(article.published_at.as_deref()),
            summary: summarize(description.as_deref(), SUMMARY_WIDTH),
            url,
        }
    }

    pub fn url_label(&self) -> &str {
        self.url.as_deref().unwrap_or("(no link)")
    }
}

pub fn records(articles: &[Article]) -> Vec<DisplayRecord> {
    articles
        .iter()
        .enumerate()
        .map(|(i, a)| DisplayRecord::from_article(i + 1, a))
        .collect()
}

pub fn write_console_block<W: Write>(out: &mut W, rec: &DisplayRecord) -> io::Result<()> {
    writeln!(out, "Title: {}", rec.title)?;
    writeln!(out, "Source: {}", rec.source)?;
    writeln!(out, "Published: {}", rec.published)?;
    writeln!(out, "Summary: {}", rec.summary)?;
    writeln!(out, "Read More: {}", rec.url_label())?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

/// Console report for one fetch cycle, in the order the API returned it.
pub fn write_report<W: Write>(out: &mut W, articles: &[Article]) -> io::Result<()> {
    if articles.is_empty() {
        return writeln!(out, "No cybersecurity-related news found.");
    }
    writeln!(out, "Fetched {} cybersecurity news articles. \n", articles.len())?;
    for rec in records(articles) {
        write_console_block(out, &rec)?;
    }
    Ok(())
}

/// Lines for one entry in the interactive output pane.
pub fn pane_lines(rec: &DisplayRecord) -> Vec<String> {
    let link = match &rec.url {
        Some(u) => style(u.as_str()).cyan().underlined().to_string(),
        None => style("(no link)").dim().to_string(),
    };
    vec![
        style(format!("{}. {}", rec.id, rec.title)).bold().to_string(),
        format!("Read more: {link}"),
        format!("Source: {} | Published: {}", rec.source, rec.published),
        format!("Summary: {}", rec.summary),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::model::Source;

    fn article(title: &str, source: Option<&str>, published: &str, description: &str) -> Article {
        Article {
            title: Some(title.into()),
            description: Some(description.into()),
            url: Some(format!("https://example.com/{title}")),
            source: source.map(|n| Source {
                name: Some(n.into()),
            }),
            published_at: Some(published.into()),
        }
    }

    fn render(articles: &[Article]) -> String {
        let mut out = Vec::new();
        write_report(&mut out, articles).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_result_reports_nothing_found() {
        assert_eq!(render(&[]), "No cybersecurity-related news found.\n");
    }

    #[test]
    fn three_articles_render_in_order_with_all_fields() {
        let long = "word ".repeat(40);
        let articles = vec![
            article("first", Some("The Hacker News"), "2024-05-03T12:00:00Z", "short"),
            article("second", None, "garbage", &long),
            article("third", Some("Dark Reading"), "2024-05-01T08:30:00Z", ""),
        ];
        let text = render(&articles);

        assert!(text.starts_with("Fetched 3 cybersecurity news articles. \n\n"));
        let first = text.find("Title: first").unwrap();
        let second = text.find("Title: second").unwrap();
        let third = text.find("Title: third").unwrap();
        assert!(first < second && second < third);

        assert!(text.contains("Source: The Hacker News"));
        assert!(text.contains("Source: Unknown Source"));
        assert!(text.contains("Published: May 03, 2024 at 12:00 UTC"));
        assert!(text.contains("Published: Unknown date"));
        assert!(text.contains("Summary: short\n"));
        assert!(text.contains("Summary: No description available"));
        assert!(text.contains("Read More: https://example.com/second"));
        assert_eq!(text.matches(&"-".repeat(80)).count(), 3);

        let truncated = text
            .lines()
            .find(|l| l.starts_with("Summary: word"))
            .unwrap();
        assert!(truncated.ends_with("..."));
        assert!(truncated.trim_start_matches("Summary: ").chars().count() <= SUMMARY_WIDTH);
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let rec = DisplayRecord::from_article(1, &Article::default());
        assert_eq!(rec.title, "(untitled)");
        assert_eq!(rec.source, "Unknown Source");
        assert_eq!(rec.published, "Unknown date");
        assert_eq!(rec.summary, "No description available");
        assert_eq!(rec.url_label(), "(no link)");
    }

    #[test]
    fn untrusted_text_is_sanitized() {
        let mut a = article("x", Some("\x1b[31mEvil\x1b[0m"), "2024-05-03T12:00:00Z", "a\nb");
        a.title = Some("Breach\x1b[2J at vendor".into());
        let rec = DisplayRecord::from_article(1, &a);
        assert_eq!(rec.title, "Breach at vendor");
        assert_eq!(rec.source, "Evil");
        assert_eq!(rec.summary, "a b");
    }

    #[test]
    fn long_urls_are_kept_whole() {
        let url = format!("https://example.com/?q={}", "a".repeat(3000));
        let a = Article {
            url: Some(url.clone()),
            ..Default::default()
        };
        let rec = DisplayRecord::from_article(1, &a);
        assert_eq!(rec.url.as_deref(), Some(url.as_str()));
    }

    #[test]
    fn long_titles_are_shortened_with_marker() {
        let a = Article {
            title: Some("breach ".repeat(100)),
            ..Default::default()
        };
        let rec = DisplayRecord::from_article(1, &a);
        assert!(rec.title.ends_with("..."));
        assert!(rec.title.chars().count() <= FIELD_CAP);
    }

    #[test]
    fn ids_are_one_based_positions() {
        let articles = vec![Article::default(), Article::default()];
        let ids: Vec<_> = records(&articles).iter().map(|r| r.id).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn pane_entry_has_numbered_title_and_link() {
        let rec = DisplayRecord::from_article(
            2,
            &article("Patch", Some("SecurityWeek"), "2024-05-01T08:30:00Z", "d"),
        );
        let lines = pane_lines(&rec);
        assert_eq!(lines.len(), 4);
        assert!(console::strip_ansi_codes(&lines[0]).contains("2. Patch"));
        assert!(console::strip_ansi_codes(&lines[1]).contains("Read more: https://example.com/Patch"));
        assert!(lines[2].contains("SecurityWeek"));
        assert!(lines[2].contains("May 01, 2024 at 08:30 UTC"));
    }
}
