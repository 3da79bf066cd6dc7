pub mod config;
pub mod directory;
pub mod error;
pub mod geocode;
pub mod pipeline;
pub mod postcode;
pub mod sink;
pub mod types;

pub use config::CrawlConfig;
pub use directory::{extract_address_texts, DirectoryClient, PageSource};
pub use error::ScraperError;
pub use geocode::{GeocodeClient, Resolver};
pub use pipeline::CrawlPipeline;
pub use postcode::extract_postcode;
pub use sink::{CsvSink, RowSink};
pub use types::{CrawlSummary, GridPoint, OutputRow, OutputSchema};
