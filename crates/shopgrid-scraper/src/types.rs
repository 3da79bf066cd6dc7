//! Domain types shared across the crawl pipeline.

/// A planar grid coordinate (OS National Grid easting/northing) produced by
/// one postcode lookup. Never cached: two occurrences of the same postcode
/// on different pages yield two independently resolved `GridPoint`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPoint {
    pub easting: i64,
    pub northing: i64,
}

/// One output row, appended exactly once and never updated.
///
/// `grid` is `Some` in the enrichment variant and `None` in the
/// extraction-only variant; the choice is fixed for a whole run.
/// Duplicate postcodes across addresses are legitimate and are not
/// collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub postcode: String,
    pub grid: Option<GridPoint>,
}

/// Column layout of the output artifact, fixed before the first row is
/// written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSchema {
    /// Single `postcode` column.
    Postcode,
    /// `postcode,easting,northing` columns.
    PostcodeGrid,
}

/// Counters reported by a completed crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Number of page fetches made, including the terminating empty page.
    pub pages_fetched: u32,
    /// Number of address texts seen across all non-empty pages.
    pub addresses_seen: usize,
    /// Number of rows appended to the sink (header excluded).
    pub rows_written: usize,
}
