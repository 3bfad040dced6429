//! Same-site page collector.
//!
//! Crawls breadth-first from a start URL, following only links on the start
//! URL's host and port, and appends the visible text of every fetched page to
//! a corpus file that can be fed to the extractor:
//!
//! ```text
//!
//!
//! === Content from https://example.org/ ===
//! <visible text, one fragment per line>
//! ```

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::time::Duration;

use scraper::{Html, Selector};
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error::{Error, ErrorContext};
use crate::transport::TransportError;
use crate::Result;

pub const DEFAULT_MAX_PAGES: usize = 100;
pub const DEFAULT_OUTPUT: &str = "scraped_text.txt";
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Elements whose text never counts as visible.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript"];

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub start_url: Url,
    pub max_pages: usize,
    pub output: PathBuf,
    /// Pause after each successfully scraped page.
    pub delay: Duration,
    pub request_timeout: Duration,
}

impl CrawlConfig {
    pub fn new(start_url: &str) -> Result<Self> {
        let start_url = parse_start_url(start_url)?;
        Ok(Self {
            start_url,
            max_pages: DEFAULT_MAX_PAGES,
            output: PathBuf::from(DEFAULT_OUTPUT),
            delay: DEFAULT_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn max_pages(mut self, n: usize) -> Self {
        self.max_pages = n;
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages_scraped: usize,
    /// URLs that could not be fetched, in crawl order.
    pub failed: Vec<String>,
}

pub struct Collector {
    client: reqwest::Client,
    config: CrawlConfig,
}

impl Collector {
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("kg-collect/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;
        Ok(Self { client, config })
    }

    /// Run the crawl. The output file is truncated first.
    pub async fn run(&self) -> Result<CrawlSummary> {
        let mut out = tokio::fs::File::create(&self.config.output).await?;
        let mut summary = CrawlSummary::default();

        let mut visited: HashSet<String> = HashSet::new();
        let mut queued: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<Url> = VecDeque::new();
        queued.insert(self.config.start_url.to_string());
        queue.push_back(self.config.start_url.clone());

        while summary.pages_scraped < self.config.max_pages {
            let Some(url) = queue.pop_front() else {
                break;
            };
            queued.remove(url.as_str());
            if !visited.insert(url.to_string()) {
                continue;
            }

            tracing::info!(
                url = %url,
                page = summary.pages_scraped + 1,
                max_pages = self.config.max_pages,
                "scraping"
            );
            let html = match self.fetch(&url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(url = %url, "failed to scrape: {}", e);
                    summary.failed.push(url.to_string());
                    continue;
                }
            };

            let (text, links) = {
                let document = Html::parse_document(&html);
                (
                    extract_text(&document),
                    extract_links(&document, &url, &self.config.start_url),
                )
            };
            let section = format!("\n\n=== Content from {} ===\n{}\n", url, text);
            out.write_all(section.as_bytes()).await?;
            summary.pages_scraped += 1;

            for link in links {
                let key = link.to_string();
                if !visited.contains(&key) && queued.insert(key) {
                    queue.push_back(link);
                }
            }

            if !self.config.delay.is_zero() && summary.pages_scraped < self.config.max_pages {
                tokio::time::sleep(self.config.delay).await;
            }
        }

        out.flush().await?;
        tracing::info!(
            pages = summary.pages_scraped,
            failed = summary.failed.len(),
            output = %self.config.output.display(),
            "crawl complete"
        );
        Ok(summary)
    }

    async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        response
            .text()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))
    }
}

fn parse_start_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|e| {
        Error::validation_with_context(
            format!("invalid start URL '{}'", raw),
            ErrorContext::new()
                .with_details(e.to_string())
                .with_source("collector"),
        )
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::validation(format!(
            "start URL must be http or https, got '{}'",
            url.scheme()
        )));
    }
    url.set_fragment(None);
    Ok(url)
}

/// Visible text of an HTML document: every text node outside script-like
/// elements, trimmed, blank ones dropped, one per line.
pub fn extract_text(document: &Html) -> String {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
            });
            if hidden {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Absolute http(s) links in `document`, resolved against `page` and kept only
/// when they point at the same host and port as `site`. Fragments are dropped.
pub fn extract_links(document: &Html, page: &Url, site: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| page.join(href.trim()).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .filter(|url| same_site(url, site))
        .map(|mut url| {
            url.set_fragment(None);
            url
        })
        .collect()
}

fn same_site(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port_or_known_default() == b.port_or_known_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Fire Updates</title>
  <style>body { color: red; }</style>
  <script>var tracking = "secret";</script>
</head>
<body>
  <h1>  Evacuation orders  </h1>
  <p>Shelters are open.</p>
  <noscript>Enable JavaScript</noscript>
  <a href="/shelters#north">Shelters</a>
  <a href="relief.html">Relief</a>
  <a href="https://other.example.com/news">Elsewhere</a>
  <a href="mailto:help@example.org">Mail</a>
  <a href="http://example.org:8080/alt">Other port</a>
</body>
</html>"#;

    #[test]
    fn test_extract_text_skips_hidden_elements() {
        let text = extract_text(&Html::parse_document(PAGE));
        assert_eq!(
            text,
            "Fire Updates\nEvacuation orders\nShelters are open.\nShelters\nRelief\nElsewhere\nMail\nOther port"
        );
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_extract_links_same_site_only() {
        let page = Url::parse("https://example.org/updates/index.html").unwrap();
        let site = Url::parse("https://example.org/").unwrap();
        let document = Html::parse_document(PAGE);
        let links: Vec<String> = extract_links(&document, &page, &site)
            .into_iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(
            links,
            vec![
                "https://example.org/shelters".to_string(),
                "https://example.org/updates/relief.html".to_string(),
            ]
        );
    }

    #[test]
    fn test_one_document_serves_text_and_links() {
        let document = Html::parse_document(PAGE);
        let page = Url::parse("https://example.org/").unwrap();
        let links = extract_links(&document, &page, &page);
        let text = extract_text(&document);
        assert_eq!(links.len(), 2);
        assert!(text.starts_with("Fire Updates
"));
    }

    #[test]
    fn test_run_future_is_send() {
        fn assert_send<T: Send>(_: &T) {}
        let collector = Collector::new(CrawlConfig::new("https://example.org/").unwrap()).unwrap();
        let run = collector.run();
        assert_send(&run);
    }

    #[test]
    fn test_start_url_validation() {
        assert!(CrawlConfig::new("not a url").is_err());
        assert!(CrawlConfig::new("ftp://example.org/").is_err());

        let cfg = CrawlConfig::new("https://example.org/start#top").unwrap();
        assert_eq!(cfg.start_url.as_str(), "https://example.org/start");
        assert_eq!(cfg.max_pages, DEFAULT_MAX_PAGES);
    }
}
