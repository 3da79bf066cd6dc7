//! Crawls the bookshop directory and writes the postcode CSV.
//!
//! Takes no arguments: a run is fully described by `CrawlConfig::default()`
//! and the output file is overwritten each execution.

use std::fs::File;

use shopgrid_scraper::{CrawlConfig, CrawlPipeline, CsvSink, DirectoryClient, GeocodeClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = CrawlConfig::default();

    let directory = DirectoryClient::new(
        &config.directory_base_url,
        config.timeout_secs,
        &config.user_agent,
    )?;

    let pipeline = if config.enrichment {
        let geocode = GeocodeClient::new(
            &config.geocode_base_url,
            config.timeout_secs,
            &config.user_agent,
        )?;
        CrawlPipeline::with_resolver(Box::new(directory), Box::new(geocode))
    } else {
        CrawlPipeline::extraction_only(Box::new(directory))
    };

    let file = File::create(&config.output_path)?;
    let mut sink = CsvSink::from_writer(file);

    let summary = pipeline.run(&mut sink).await?;

    tracing::info!(
        pages = summary.pages_fetched,
        addresses = summary.addresses_seen,
        rows = summary.rows_written,
        output = %config.output_path.display(),
        "crawl complete"
    );

    Ok(())
}
