//! Crawl orchestration.
//!
//! Drives pagination from page 1 and sequences the per-address chain:
//! extract a postcode, optionally resolve it to a grid coordinate, append a
//! row. The first page with zero addresses terminates the crawl; there is
//! no gap tolerance, so a spuriously empty page mid-run ends it early.
//! Everything is sequential: one fetch or lookup in flight at a time.

use crate::directory::PageSource;
use crate::error::ScraperError;
use crate::geocode::Resolver;
use crate::postcode::extract_postcode;
use crate::sink::RowSink;
use crate::types::{CrawlSummary, OutputRow, OutputSchema};

/// The extraction-and-enrichment pipeline.
///
/// The two output variants are one pipeline parameterized by an optional
/// resolver: attaching one selects the three-column grid schema, omitting
/// it the single-column postcode schema.
pub struct CrawlPipeline {
    source: Box<dyn PageSource>,
    resolver: Option<Box<dyn Resolver>>,
}

impl CrawlPipeline {
    /// Extraction-only variant: rows carry the postcode column only.
    #[must_use]
    pub fn extraction_only(source: Box<dyn PageSource>) -> Self {
        Self {
            source,
            resolver: None,
        }
    }

    /// Enrichment variant: every extracted postcode is resolved and rows
    /// carry grid coordinates.
    #[must_use]
    pub fn with_resolver(source: Box<dyn PageSource>, resolver: Box<dyn Resolver>) -> Self {
        Self {
            source,
            resolver: Some(resolver),
        }
    }

    /// Output schema implied by the configured variant.
    #[must_use]
    pub fn schema(&self) -> OutputSchema {
        if self.resolver.is_some() {
            OutputSchema::PostcodeGrid
        } else {
            OutputSchema::Postcode
        }
    }

    /// Runs the crawl to completion, writing the header and all rows to
    /// `sink`.
    ///
    /// Addresses without a postcode, and postcodes without a usable
    /// England lookup result, are skipped silently. Any transport or parse
    /// failure aborts the run; rows already appended stay in the sink.
    ///
    /// # Errors
    ///
    /// Propagates the first error from the page source, the resolver, or
    /// the sink.
    pub async fn run<S: RowSink>(&self, sink: &mut S) -> Result<CrawlSummary, ScraperError> {
        sink.write_header(self.schema())?;

        let mut summary = CrawlSummary::default();
        let mut page: u32 = 1;

        loop {
            let addresses = self.source.fetch_page(page).await?;
            summary.pages_fetched += 1;

            if addresses.is_empty() {
                tracing::info!(page, "empty directory page, crawl complete");
                break;
            }

            for address in &addresses {
                summary.addresses_seen += 1;

                let Some(postcode) = extract_postcode(address) else {
                    tracing::debug!(address = address.as_str(), "no postcode in address");
                    continue;
                };

                let grid = match &self.resolver {
                    Some(resolver) => match resolver.resolve(&postcode).await? {
                        Some(grid) => Some(grid),
                        None => continue,
                    },
                    None => None,
                };

                sink.append(&OutputRow { postcode, grid })?;
                summary.rows_written += 1;
            }

            tracing::info!(page, addresses = addresses.len(), "processed directory page");
            page += 1;
        }

        sink.flush()?;
        Ok(summary)
    }
}
