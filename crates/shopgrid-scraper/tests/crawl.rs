//! End-to-end crawl tests over wiremock: directory pages and the geocode
//! lookup are served by one local mock server, output goes to an in-memory
//! CSV sink.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopgrid_scraper::{
    CrawlPipeline, CrawlSummary, CsvSink, DirectoryClient, GeocodeClient, ScraperError,
};

const USER_AGENT: &str = "shopgrid-test/0.1";

/// Renders a directory page with one `shop-address` anchor per address.
fn directory_page(addresses: &[&str]) -> String {
    let mut html = String::from("<html><body><ul class=\"shops\">");
    for address in addresses {
        html.push_str(&format!(
            r#"<li><a class="shop-address" href="/bookshops/x">{address}</a></li>"#
        ));
    }
    html.push_str("</ul></body></html>");
    html
}

async fn mount_page(server: &MockServer, page: u32, addresses: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/bookshops/viewall/page/{page}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(directory_page(addresses)))
        .mount(server)
        .await;
}

async fn mount_lookup(server: &MockServer, encoded_postcode: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/postcodes/{encoded_postcode}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

fn directory_client(server: &MockServer) -> DirectoryClient {
    DirectoryClient::new(
        &format!("{}/bookshops/viewall/page/", server.uri()),
        5,
        USER_AGENT,
    )
    .expect("failed to build test DirectoryClient")
}

fn enrichment_pipeline(server: &MockServer) -> CrawlPipeline {
    let geocode =
        GeocodeClient::new(&server.uri(), 5, USER_AGENT).expect("failed to build GeocodeClient");
    CrawlPipeline::with_resolver(Box::new(directory_client(server)), Box::new(geocode))
}

fn extraction_pipeline(server: &MockServer) -> CrawlPipeline {
    CrawlPipeline::extraction_only(Box::new(directory_client(server)))
}

async fn run_to_csv(pipeline: &CrawlPipeline) -> (CrawlSummary, String) {
    let mut sink = CsvSink::from_writer(Vec::new());
    let summary = pipeline.run(&mut sink).await.expect("crawl completes");
    let bytes = sink.into_inner().expect("sink flushes");
    (summary, String::from_utf8(bytes).expect("utf-8 output"))
}

// ---------------------------------------------------------------------------
// Enrichment variant
// ---------------------------------------------------------------------------

#[tokio::test]
async fn enrichment_writes_grid_row_for_england_postcode() {
    let server = MockServer::start().await;
    mount_page(&server, 1, &["123 High St, London, SW1A 1AA"]).await;
    mount_page(&server, 2, &[]).await;
    mount_lookup(
        &server,
        "SW1A%201AA",
        json!({"status": 200, "result": {"country": "England", "eastings": 530_000, "northings": 179_000}}),
    )
    .await;

    let pipeline = enrichment_pipeline(&server);
    let (summary, csv) = run_to_csv(&pipeline).await;

    assert_eq!(csv, "postcode,easting,northing\nSW1A 1AA,530000,179000\n");
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.rows_written, 1);
}

#[tokio::test]
async fn lookup_without_result_writes_no_row() {
    let server = MockServer::start().await;
    mount_page(&server, 1, &["1 Bridge St, Lincoln, LN2 1LU"]).await;
    mount_page(&server, 2, &[]).await;

    Mock::given(method("GET"))
        .and(path("/postcodes/LN2%201LU"))
        .respond_with(ResponseTemplate::new(404).set_body_json(&json!({
            "status": 404, "error": "Invalid postcode"
        })))
        .mount(&server)
        .await;

    let pipeline = enrichment_pipeline(&server);
    let (summary, csv) = run_to_csv(&pipeline).await;

    assert_eq!(csv, "postcode,easting,northing\n");
    assert_eq!(summary.rows_written, 0);
}

#[tokio::test]
async fn non_england_lookup_writes_no_row() {
    let server = MockServer::start().await;
    mount_page(&server, 1, &["1 Royal Mile, Edinburgh, EH1 1RE"]).await;
    mount_page(&server, 2, &[]).await;
    mount_lookup(
        &server,
        "EH1%201RE",
        json!({"status": 200, "result": {"country": "Scotland", "eastings": 325_000, "northings": 673_000}}),
    )
    .await;

    let pipeline = enrichment_pipeline(&server);
    let (_, csv) = run_to_csv(&pipeline).await;

    assert_eq!(csv, "postcode,easting,northing\n");
}

#[tokio::test]
async fn unparseable_lookup_body_aborts_and_keeps_earlier_rows() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        &["Unit 1, Leeds, LS1 4AB", "2 Petergate, York, YO1 7HZ"],
    )
    .await;
    mount_lookup(
        &server,
        "LS1%204AB",
        json!({"status": 200, "result": {"country": "England", "eastings": 430_000, "northings": 434_000}}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/postcodes/YO1%207HZ"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let pipeline = enrichment_pipeline(&server);
    let mut sink = CsvSink::from_writer(Vec::new());
    let result = pipeline.run(&mut sink).await;

    assert!(
        matches!(result, Err(ScraperError::Deserialize { .. })),
        "expected Deserialize error, got: {result:?}"
    );

    // Partial output: the row written before the failure survives.
    let bytes = sink.into_inner().expect("sink flushes");
    let csv = String::from_utf8(bytes).expect("utf-8 output");
    assert_eq!(csv, "postcode,easting,northing\nLS1 4AB,430000,434000\n");
}

// ---------------------------------------------------------------------------
// Extraction-only variant
// ---------------------------------------------------------------------------

#[tokio::test]
async fn extraction_only_writes_single_column_rows() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        &[
            "123 High St, London, SW1A 1AA",
            "The Old Mill, Market Square", // no postcode: skipped
        ],
    )
    .await;
    mount_page(&server, 2, &[]).await;

    let pipeline = extraction_pipeline(&server);
    let (summary, csv) = run_to_csv(&pipeline).await;

    assert_eq!(csv, "postcode\nSW1A 1AA\n");
    assert_eq!(summary.addresses_seen, 2);
    assert_eq!(summary.rows_written, 1);
}

#[tokio::test]
async fn malformed_wigan_address_is_corrected_end_to_end() {
    let server = MockServer::start().await;
    mount_page(&server, 1, &["12 Standishgate, Wigan, WN1 1 BH"]).await;
    mount_page(&server, 2, &[]).await;

    let pipeline = extraction_pipeline(&server);
    let (_, csv) = run_to_csv(&pipeline).await;

    assert_eq!(csv, "postcode\nWN1 1BH\n");
}

#[tokio::test]
async fn duplicate_postcodes_across_pages_write_two_rows() {
    let server = MockServer::start().await;
    mount_page(&server, 1, &["Unit 1, Leeds, LS1 4AB"]).await;
    mount_page(&server, 2, &["Unit 2 (rear), Leeds, LS1 4AB"]).await;
    mount_page(&server, 3, &[]).await;

    let pipeline = extraction_pipeline(&server);
    let (summary, csv) = run_to_csv(&pipeline).await;

    assert_eq!(csv, "postcode\nLS1 4AB\nLS1 4AB\n");
    assert_eq!(summary.pages_fetched, 3);
}

// ---------------------------------------------------------------------------
// Pagination behavior
// ---------------------------------------------------------------------------

#[tokio::test]
async fn crawl_stops_at_first_empty_page_without_requesting_beyond_it() {
    let server = MockServer::start().await;
    mount_page(&server, 1, &["1 Quay St, Exeter, EX4 3HY"]).await;
    mount_page(&server, 2, &[]).await;

    // A later non-empty page exists but must never be requested: the first
    // empty page ends the crawl (no gap tolerance).
    Mock::given(method("GET"))
        .and(path("/bookshops/viewall/page/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(directory_page(&["9 Ghost Rd, HU1 1UU"])),
        )
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = extraction_pipeline(&server);
    let (summary, _) = run_to_csv(&pipeline).await;

    assert_eq!(summary.pages_fetched, 2);
}

#[tokio::test]
async fn directory_error_status_aborts_the_run() {
    let server = MockServer::start().await;
    mount_page(&server, 1, &["1 Quay St, Exeter, EX4 3HY"]).await;
    // Page 2 is unmatched: wiremock answers 404.

    let pipeline = extraction_pipeline(&server);
    let mut sink = CsvSink::from_writer(Vec::new());
    let result = pipeline.run(&mut sink).await;

    assert!(
        matches!(result, Err(ScraperError::UnexpectedStatus { status: 404, .. })),
        "expected UnexpectedStatus, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reruns_against_unchanged_responses_produce_identical_bytes() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        &["123 High St, London, SW1A 1AA", "Unit 1, Leeds, LS1 4AB"],
    )
    .await;
    mount_page(&server, 2, &[]).await;
    mount_lookup(
        &server,
        "SW1A%201AA",
        json!({"status": 200, "result": {"country": "England", "eastings": 530_000, "northings": 179_000}}),
    )
    .await;
    mount_lookup(
        &server,
        "LS1%204AB",
        json!({"status": 200, "result": {"country": "England", "eastings": 430_000, "northings": 434_000}}),
    )
    .await;

    let pipeline = enrichment_pipeline(&server);
    let (_, first) = run_to_csv(&pipeline).await;
    let (_, second) = run_to_csv(&pipeline).await;

    assert_eq!(first, second);
    assert_eq!(
        first,
        "postcode,easting,northing\nSW1A 1AA,530000,179000\nLS1 4AB,430000,434000\n"
    );
}
