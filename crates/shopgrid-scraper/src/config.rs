//! Crawl configuration.
//!
//! All previously-global knobs (directory base path, lookup service base
//! URL, output location, variant choice) live in one value passed in at
//! construction time. There are no CLI flags and no environment variables;
//! a run is fully described by a `CrawlConfig`.

use std::path::PathBuf;

/// Directory listing base path; the 1-based page index is appended directly.
pub const WATERSTONES_DIRECTORY_BASE: &str =
    "https://www.waterstones.com/bookshops/viewall/page/";

/// Base URL of the postcode lookup service.
pub const POSTCODES_IO_BASE: &str = "https://api.postcodes.io/";

pub const DEFAULT_OUTPUT_PATH: &str = "waterstones.csv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "shopgrid/0.1";

/// Configuration for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Base path of the paginated directory; page index appended verbatim.
    pub directory_base_url: String,
    /// Base URL of the geocode lookup service.
    pub geocode_base_url: String,
    /// Request timeout for both the directory and the lookup service.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// `true` selects the enrichment variant (three-column output with grid
    /// coordinates); `false` the extraction-only variant (postcode column
    /// only).
    pub enrichment: bool,
    /// Output file, overwritten on every run.
    pub output_path: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            directory_base_url: WATERSTONES_DIRECTORY_BASE.to_owned(),
            geocode_base_url: POSTCODES_IO_BASE.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            enrichment: true,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}
