//! HTTP client for the paginated shop directory.
//!
//! Pages are addressed by appending a 1-based index to a fixed base path.
//! A page "has results" when it contains one or more anchors carrying the
//! `shop-address` class; a page with zero such anchors is the termination
//! signal for the crawl.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;

use crate::error::ScraperError;

/// Class token identifying address-bearing anchors in the directory markup.
pub const SHOP_ADDRESS_CLASS: &str = "shop-address";

static ADDRESS_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Inner text of every <a> whose class attribute contains the
    // `shop-address` token (space-delimited, any position).
    Regex::new(&format!(
        r#"(?is)<a\b[^>]*class\s*=\s*"(?:[^"]*\s)?{SHOP_ADDRESS_CLASS}(?:\s[^"]*)?"[^>]*>(.*?)</a>"#
    ))
    .expect("valid regex")
});

/// Extracts the address text of every `shop-address` anchor in `html`, in
/// document order, trimmed. The count (including anchors with empty text)
/// is what drives crawl termination, so nothing is filtered out here.
#[must_use]
pub fn extract_address_texts(html: &str) -> Vec<String> {
    ADDRESS_ANCHOR_RE
        .captures_iter(html)
        .map(|caps| caps[1].trim().to_owned())
        .collect()
}

/// Source of raw address texts, one page at a time.
///
/// An empty result cleanly signals "zero addresses" so the pipeline can
/// terminate; order within a page is preserved for reproducibility.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the addresses listed on 1-based page `page`.
    ///
    /// # Errors
    ///
    /// Returns an error when the page cannot be fetched; a reachable page
    /// with no addresses is `Ok(vec![])`, not an error.
    async fn fetch_page(&self, page: u32) -> Result<Vec<String>, ScraperError>;
}

/// Blocking-style (one request in flight) client for the shop directory.
pub struct DirectoryClient {
    client: Client,
    base_url: String,
}

impl DirectoryClient {
    /// Creates a `DirectoryClient` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_owned(),
        })
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}{page}", self.base_url)
    }
}

#[async_trait]
impl PageSource for DirectoryClient {
    /// Fetches one directory page and returns its address texts.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] — any non-2xx status.
    /// - [`ScraperError::Http`] — network or TLS failure.
    async fn fetch_page(&self, page: u32) -> Result<Vec<String>, ScraperError> {
        let url = self.page_url(page);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let addresses = extract_address_texts(&body);
        tracing::debug!(page, count = addresses.len(), "fetched directory page");
        Ok(addresses)
    }
}
