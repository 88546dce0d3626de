//! SEO page scan
//!
//! Fetches a page over HTTP and extracts a fixed-shape report: title, meta
//! description, heading counts, images missing alternative text, and an
//! approximate visible word count.

use super::RetrievalError;
use crate::runtime::traits::PageFetcher;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::fmt;
use std::time::Duration;

/// Tags whose text content is never visible page copy
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template", "title"];

/// HTTP page fetcher for the SEO scan
pub struct PageInspector {
    client: Client,
}

impl PageInspector {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent("Mozilla/5.0 (compatible; switchboard/0.1)")
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for PageInspector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for PageInspector {
    async fn fetch(&self, url: &str) -> Result<String, RetrievalError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))
    }
}

/// Extracted SEO signals for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoReport {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub h1_count: usize,
    pub h2_count: usize,
    pub images_missing_alt: usize,
    pub word_count: usize,
}

impl fmt::Display for SeoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", self.title.as_deref().unwrap_or("(none)"))?;
        writeln!(
            f,
            "Meta description: {}",
            self.meta_description.as_deref().unwrap_or("(none)")
        )?;
        writeln!(f, "H1 headings: {}", self.h1_count)?;
        writeln!(f, "H2 headings: {}", self.h2_count)?;
        writeln!(f, "Images missing alt text: {}", self.images_missing_alt)?;
        write!(f, "Approximate word count: {}", self.word_count)
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Extract the report from raw HTML. Pure and offline.
pub fn extract_report(html: &str) -> SeoReport {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&selector("title"))
        .next()
        .map(|el| collapse(el.text()))
        .filter(|t| !t.is_empty());

    let meta_description = doc
        .select(&selector(r#"meta[name="description"]"#))
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string);

    let h1_count = doc.select(&selector("h1")).count();
    let h2_count = doc.select(&selector("h2")).count();

    let images_missing_alt = doc
        .select(&selector("img"))
        .filter(|img| {
            img.value()
                .attr("alt")
                .is_none_or(|alt| alt.trim().is_empty())
        })
        .count();

    SeoReport {
        title,
        meta_description,
        h1_count,
        h2_count,
        images_missing_alt,
        word_count: visible_word_count(&doc),
    }
}

fn collapse<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whitespace-token count over text nodes outside script/style subtrees.
fn visible_word_count(doc: &Html) -> usize {
    doc.tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_text().map(|text| (node, text)))
        .filter(|(node, _)| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| INVISIBLE_TAGS.contains(&el.name()))
            })
        })
        .map(|(_, text)| text.split_whitespace().count())
        .sum()
}

/// Produce context text for an SEO route. Never fails.
pub(crate) async fn inspect(fetcher: &dyn PageFetcher, target: &str) -> String {
    match fetcher.fetch(target).await {
        Ok(html) => format!("SEO report for {target}\n{}", extract_report(&html)),
        Err(e) => format!("Error analyzing {target}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::MockPageFetcher;

    const FIXTURE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>  Example   Domain </title>
  <meta name="description" content="An example page.">
  <style>body { color: red; }</style>
  <script>var hidden = "not visible words";</script>
</head>
<body>
  <h1>Welcome</h1>
  <h2>First section</h2>
  <h2>Second section</h2>
  <img src="a.png" alt="diagram">
  <img src="b.png" alt="">
  <img src="c.png">
  <p>This page has exactly nine visible words right here.</p>
</body>
</html>"#;

    #[test]
    fn extracts_title_and_description() {
        let report = extract_report(FIXTURE);
        assert_eq!(report.title.as_deref(), Some("Example Domain"));
        assert_eq!(report.meta_description.as_deref(), Some("An example page."));
    }

    #[test]
    fn counts_headings() {
        let report = extract_report(FIXTURE);
        assert_eq!(report.h1_count, 1);
        assert_eq!(report.h2_count, 2);
    }

    #[test]
    fn counts_images_missing_alt() {
        // Empty alt counts as missing alongside the absent attribute
        let report = extract_report(FIXTURE);
        assert_eq!(report.images_missing_alt, 2);
    }

    #[test]
    fn word_count_skips_script_and_style() {
        let report = extract_report(FIXTURE);
        // Welcome + First section + Second section + the nine-word paragraph
        assert_eq!(report.word_count, 14);
    }

    #[test]
    fn empty_document_yields_empty_report() {
        let report = extract_report("");
        assert_eq!(report.title, None);
        assert_eq!(report.meta_description, None);
        assert_eq!(report.h1_count, 0);
        assert_eq!(report.images_missing_alt, 0);
        assert_eq!(report.word_count, 0);
    }

    #[test]
    fn report_has_fixed_shape() {
        let report = extract_report(FIXTURE);
        let rendered = report.to_string();
        assert!(rendered.contains("Title: Example Domain"));
        assert!(rendered.contains("H1 headings: 1"));
        assert!(rendered.contains("H2 headings: 2"));
        assert!(rendered.contains("Images missing alt text: 2"));
        assert!(rendered.contains("Approximate word count: 14"));
    }

    #[tokio::test]
    async fn fetch_error_degrades_to_text() {
        let fetcher = MockPageFetcher::failing("dns failure");
        let text = inspect(&fetcher, "https://example.com").await;
        assert!(text.starts_with("Error analyzing https://example.com:"));
        assert!(text.contains("dns failure"));
    }

    #[tokio::test]
    async fn fetched_page_yields_report() {
        let fetcher = MockPageFetcher::returning(FIXTURE);
        let text = inspect(&fetcher, "https://example.com").await;
        assert!(text.starts_with("SEO report for https://example.com"));
        assert!(text.contains("Approximate word count: 14"));
    }
}
