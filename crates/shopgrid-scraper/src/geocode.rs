//! Postcode-to-grid resolution via a postcodes.io-style lookup service.
//!
//! One lookup per postcode, strictly sequential, no batching and no caching:
//! the same postcode appearing on two pages is resolved twice. The service
//! answers unknown postcodes with a JSON body that simply lacks the `result`
//! field (it happens to use a 404 status for those, so the status code is
//! not consulted before parsing).
//!
//! The directory lists shops outside England whose postcodes still match
//! the UK grammar; those resolve with a different `country` and are
//! intentionally dropped.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::ScraperError;
use crate::types::GridPoint;

/// The only country whose lookups produce output rows.
pub const ENGLAND: &str = "England";

/// Resolves one postcode to at most one grid coordinate.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// `Ok(None)` means "no usable result" and is a normal, silent outcome;
    /// `Err` means the lookup transport or its payload broke and the run
    /// must abort.
    async fn resolve(&self, postcode: &str) -> Result<Option<GridPoint>, ScraperError>;
}

/// Lookup response envelope. `result` is absent for unknown postcodes.
#[derive(Debug, Deserialize)]
struct PostcodeLookupResponse {
    #[serde(default)]
    result: Option<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    country: String,
    #[serde(default)]
    eastings: Option<i64>,
    #[serde(default)]
    northings: Option<i64>,
}

/// HTTP client for the postcode lookup service.
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
}

impl GeocodeClient {
    /// Creates a `GeocodeClient` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] — `base_url` does not parse.
    /// - [`ScraperError::Http`] — the `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let base_url = Url::parse(base_url).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Builds `{base}/postcodes/{postcode}`, percent-encoding the space in
    /// the postcode.
    fn lookup_url(&self, postcode: &str) -> Result<Url, ScraperError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ScraperError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "cannot be a base URL".to_owned(),
            })?
            .pop_if_empty()
            .push("postcodes")
            .push(postcode);
        Ok(url)
    }
}

#[async_trait]
impl Resolver for GeocodeClient {
    /// Looks up one postcode.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] — network or TLS failure.
    /// - [`ScraperError::Deserialize`] — the body is not the expected JSON.
    async fn resolve(&self, postcode: &str) -> Result<Option<GridPoint>, ScraperError> {
        let url = self.lookup_url(postcode)?;
        let response = self.client.get(url).send().await?;
        let body = response.text().await?;

        let parsed: PostcodeLookupResponse =
            serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
                context: format!("postcode lookup for {postcode}"),
                source: e,
            })?;

        let Some(result) = parsed.result else {
            tracing::debug!(postcode, "no lookup result");
            return Ok(None);
        };

        if result.country != ENGLAND {
            tracing::debug!(postcode, country = %result.country, "dropping non-England postcode");
            return Ok(None);
        }

        let (Some(easting), Some(northing)) = (result.eastings, result.northings) else {
            tracing::debug!(postcode, "lookup result carries no grid coordinates");
            return Ok(None);
        };

        Ok(Some(GridPoint { easting, northing }))
    }
}
