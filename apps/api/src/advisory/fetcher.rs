//! Advisory Fetcher: downloads an advisory page and renders it as plain text.
//!
//! Uses reqwest for HTTP and the scraper crate for HTML parsing.
//! No JavaScript rendering, no retries, no caching.

use std::collections::HashMap;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, warn};

use crate::advisory::models::AdvisoryDocument;
use crate::errors::AppError;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Elements whose text never reaches the rendered document.
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "head", "iframe",
];

/// Elements that start a new line in the rendered text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Loads the document behind a URL. Swappable so the pipeline can run without a network.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<AdvisoryDocument, AppError>;
}

/// Fetches pages over HTTP and converts the HTML to text.
pub struct WebPageLoader {
    client: reqwest::Client,
}

impl WebPageLoader {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    async fn fetch_html(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            // The body is still converted; a "page not found" page is handled by the prompt.
            warn!(%status, %url, "Advisory page returned non-success status");
        }

        response.text().await
    }
}

#[async_trait]
impl DocumentLoader for WebPageLoader {
    async fn load(&self, url: &str) -> Result<AdvisoryDocument, AppError> {
        let start = std::time::Instant::now();

        let html = self
            .fetch_html(url)
            .await
            .map_err(|e| AppError::Fetch(format!("Error retrieving web content: {e}")))?;

        let document = html_to_document(url, &html);

        debug!(
            %url,
            text_chars = document.text.chars().count(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Fetched advisory page"
        );

        Ok(document)
    }
}

/// Parses an HTML page into metadata and plain text.
pub fn html_to_document(source: &str, html: &str) -> AdvisoryDocument {
    let page = Html::parse_document(html);

    let mut metadata = HashMap::new();
    metadata.insert("source".to_string(), source.to_string());
    if let Some(title) = extract_title(&page) {
        metadata.insert("title".to_string(), title);
    }
    if let Some(description) = extract_meta_description(&page) {
        metadata.insert("description".to_string(), description);
    }
    if let Some(language) = extract_language(&page) {
        metadata.insert("language".to_string(), language);
    }

    AdvisoryDocument {
        metadata,
        text: extract_text(&page),
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn extract_title(page: &Html) -> Option<String> {
    let title_selector = selector("title")?;
    page.select(&title_selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

fn extract_meta_description(page: &Html) -> Option<String> {
    let meta_selector = selector("meta[name]")?;
    page.select(&meta_selector)
        .find(|el| {
            el.value()
                .attr("name")
                .is_some_and(|name| name.eq_ignore_ascii_case("description"))
        })
        .and_then(|el| el.value().attr("content"))
        .map(collapse_whitespace)
        .filter(|d| !d.is_empty())
}

fn extract_language(page: &Html) -> Option<String> {
    page.root_element()
        .value()
        .attr("lang")
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
}

/// Renders `<body>` (or the whole page when there is none) as plain text in
/// document order, one block per line.
fn extract_text(page: &Html) -> String {
    let body_selector = selector("body");
    let root = body_selector
        .as_ref()
        .and_then(|s| page.select(s).next())
        .unwrap_or_else(|| page.root_element());

    let mut raw = String::new();
    render_element(root, &mut raw);

    let mut lines: Vec<String> = Vec::new();
    for line in raw.lines() {
        let line = collapse_whitespace(line);
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines.join("\n")
}

fn render_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if SKIPPED_ELEMENTS.contains(&name) {
        return;
    }

    let is_block = BLOCK_ELEMENTS.contains(&name);
    if is_block {
        out.push('\n');
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    render_element(child_element, out);
                }
            }
            _ => {}
        }
    }

    if is_block {
        out.push('\n');
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
