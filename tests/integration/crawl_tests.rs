//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the archive and run the full crawl pipeline
//! end-to-end against it.

use chrono::NaiveDate;
use drudge_links::config::{Config, SourceConfig};
use drudge_links::crawler::{Coordinator, CrawlPhase, CrawlRequest};
use std::collections::HashSet;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock archive
fn create_test_config(base_url: &str, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.source = SourceConfig {
        base_url: format!("{}/", base_url),
        snapshot_prefix: format!("{}/data", base_url),
        first_date: NaiveDate::from_ymd_opt(2001, 11, 18).unwrap(),
    };
    config.output.first_appearances_path = dir
        .path()
        .join("first_appearances.csv")
        .to_string_lossy()
        .into_owned();
    config
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Day listing page linking to the given snapshot paths
fn day_page_html(base_url: &str, snapshots: &[&str]) -> String {
    let links: String = snapshots
        .iter()
        .map(|s| format!(r#"<a href="{}{}">{}</a><br>"#, base_url, s, s))
        .collect();
    format!(
        r#"<html><body>
        <a href="{}/dsp/timeline_html.htm">Timeline</a>
        {}
        </body></html>"#,
        base_url, links
    )
}

/// Snapshot page with a masthead, a content block and a footer
fn snapshot_html(content_links: &[&str]) -> String {
    let links: String = content_links
        .iter()
        .map(|l| format!(r#"<a href="{}">story</a><br>"#, l))
        .collect();
    format!(
        r##"<html><body>
        <a href="http://masthead.example.com/">Masthead</a>
        <hr color="#0000A0">
        <a href="http://top.example.com/">Top</a>
        <hr color="#0000A0">
        {}
        <hr color="#0000A0">
        <a href="http://footer.example.com/">Footer</a>
        </body></html>"##,
        links
    )
}

async fn mount_day(server: &MockServer, day_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(day_path))
        .and(query_param("s", "flag"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_snapshot(server: &MockServer, snapshot_path: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(snapshot_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(snapshot_html(links)))
        .mount(server)
        .await;
}

/// Reads a CSV into header and rows
fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open CSV");
    let headers = reader
        .headers()
        .expect("Failed to read header")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.expect("Bad row").iter().map(str::to_string).collect())
        .collect();
    (headers, rows)
}

#[tokio::test]
async fn test_two_days_one_snapshot_each() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_day(
        &server,
        "/data/2017/01/13/index.htm",
        day_page_html(
            &base,
            &[
                "/data/2017/01/13/20170113_000211.htm",
                "/data/2017/01/13/20170113_080000.htm",
                "/data/2017/01/13/20170113_160000.htm",
            ],
        ),
    )
    .await;
    mount_day(
        &server,
        "/data/2017/01/14/index.htm",
        day_page_html(
            &base,
            &[
                "/data/2017/01/14/20170114_010000.htm",
                "/data/2017/01/14/20170114_120000.htm",
            ],
        ),
    )
    .await;
    mount_snapshot(
        &server,
        "/data/2017/01/13/20170113_000211.htm",
        &["http://www.a.com/story", "http://b.com/story"],
    )
    .await;
    mount_snapshot(
        &server,
        "/data/2017/01/14/20170114_010000.htm",
        &["http://www.a.com/story", "http://c.com/new"],
    )
    .await;

    let output = dir.path().join("links.csv");
    let config = create_test_config(&base, &dir);
    let firsts_path = config.output.first_appearances_path.clone();
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let report = coordinator
        .run(&CrawlRequest {
            start: day(2017, 1, 13),
            end: day(2017, 1, 14),
            per_day: 1,
            output: output.clone(),
        })
        .await
        .expect("Crawl failed");

    assert_eq!(coordinator.phase(), CrawlPhase::Done);
    assert_eq!(report.days, 2);
    assert_eq!(report.snapshots, 2);
    assert_eq!(report.day_failures, 0);
    assert_eq!(report.snapshot_failures, 0);
    assert_eq!(report.rows_written, 4);

    // Exactly two listings and at most two snapshot fetches
    let requests = server.received_requests().await.expect("Recording disabled");
    let listings = requests
        .iter()
        .filter(|r| r.url.path().ends_with("/index.htm"))
        .count();
    assert_eq!(listings, 2);
    assert!(requests.len() - listings <= 2);

    let (headers, rows) = read_csv(&output);
    assert_eq!(headers, vec!["datetime", "link_url", "archive_url"]);
    assert_eq!(rows.len(), 4);

    let archive_urls: HashSet<&str> = rows.iter().map(|r| r[2].as_str()).collect();
    assert!(archive_urls.len() <= 2);

    // Masthead and footer links are not part of the content block
    assert!(rows.iter().all(|r| !r[1].contains("masthead")));
    assert!(rows.iter().all(|r| !r[1].contains("footer")));
    assert!(rows.iter().all(|r| !r[1].contains("top.example.com")));

    let (headers, firsts) = read_csv(Path::new(&firsts_path));
    assert_eq!(headers, vec!["url", "first_appearance"]);
    assert_eq!(firsts.len(), 3);
    let a_first = firsts
        .iter()
        .find(|r| r[0] == "http://www.a.com/story")
        .expect("a.com missing");
    assert_eq!(a_first[1], "2017-01-13 00:02:11");
    let c_first = firsts
        .iter()
        .find(|r| r[0] == "http://c.com/new")
        .expect("c.com missing");
    assert_eq!(c_first[1], "2017-01-14 01:00:00");
}

#[tokio::test]
async fn test_failures_do_not_stop_the_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    // Day one is down entirely
    Mock::given(method("GET"))
        .and(path("/data/2017/01/13/index.htm"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    mount_day(
        &server,
        "/data/2017/01/14/index.htm",
        day_page_html(
            &base,
            &[
                "/data/2017/01/14/20170114_010000.htm",
                "/data/2017/01/14/20170114_020000.htm",
            ],
        ),
    )
    .await;

    // One snapshot is missing, the other is fine
    Mock::given(method("GET"))
        .and(path("/data/2017/01/14/20170114_010000.htm"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_snapshot(
        &server,
        "/data/2017/01/14/20170114_020000.htm",
        &["http://survivor.com/"],
    )
    .await;

    let output = dir.path().join("links.csv");
    let config = create_test_config(&base, &dir);
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let report = coordinator
        .run(&CrawlRequest {
            start: day(2017, 1, 13),
            end: day(2017, 1, 14),
            per_day: 0,
            output: output.clone(),
        })
        .await
        .expect("Crawl failed");

    assert_eq!(report.day_failures, 1);
    assert_eq!(report.snapshots, 2);
    assert_eq!(report.snapshot_failures, 1);
    assert_eq!(report.distinct_urls, 1);

    let (_, rows) = read_csv(&output);
    assert_eq!(
        rows,
        vec![vec![
            "2017-01-14 02:00:00".to_string(),
            "http://survivor.com/".to_string(),
            format!("{}/data/2017/01/14/20170114_020000.htm", base),
        ]]
    );
}

#[tokio::test]
async fn test_first_appearance_is_earliest_observation() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    let snapshots = [
        "/data/2017/01/13/20170113_180000.htm",
        "/data/2017/01/13/20170113_060000.htm",
        "/data/2017/01/13/20170113_120000.htm",
    ];
    mount_day(
        &server,
        "/data/2017/01/13/index.htm",
        day_page_html(&base, &snapshots),
    )
    .await;
    for snapshot in snapshots {
        mount_snapshot(&server, snapshot, &["http://same.com/story"]).await;
    }

    let output = dir.path().join("links.csv");
    let config = create_test_config(&base, &dir);
    let firsts_path = config.output.first_appearances_path.clone();
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let report = coordinator
        .run(&CrawlRequest {
            start: day(2017, 1, 13),
            end: day(2017, 1, 13),
            per_day: 0,
            output: output.clone(),
        })
        .await
        .expect("Crawl failed");

    // Every observation is kept in the links CSV
    assert_eq!(report.rows_written, 3);
    let (_, rows) = read_csv(&output);
    assert_eq!(rows.len(), 3);

    let (_, firsts) = read_csv(Path::new(&firsts_path));
    assert_eq!(
        firsts,
        vec![vec![
            "http://same.com/story".to_string(),
            "2017-01-13 06:00:00".to_string()
        ]]
    );
}

#[tokio::test]
async fn test_undated_snapshot_links_written_but_not_tracked() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_day(
        &server,
        "/data/2017/01/13/index.htm",
        day_page_html(&base, &["/data/2017/01/13/latest.htm"]),
    )
    .await;
    mount_snapshot(
        &server,
        "/data/2017/01/13/latest.htm",
        &["http://undated.com/"],
    )
    .await;

    let output = dir.path().join("links.csv");
    let config = create_test_config(&base, &dir);
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let report = coordinator
        .run(&CrawlRequest {
            start: day(2017, 1, 13),
            end: day(2017, 1, 13),
            per_day: 0,
            output: output.clone(),
        })
        .await
        .expect("Crawl failed");

    assert_eq!(report.rows_written, 1);
    assert_eq!(report.distinct_urls, 0);

    let (_, rows) = read_csv(&output);
    assert_eq!(rows[0][0], "");
    assert_eq!(rows[0][1], "http://undated.com/");
}

#[tokio::test]
async fn test_empty_range_writes_headers_only() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let output = dir.path().join("links.csv");
    let config = create_test_config(&server.uri(), &dir);
    let firsts_path = config.output.first_appearances_path.clone();
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let report = coordinator
        .run(&CrawlRequest {
            start: day(2017, 1, 14),
            end: day(2017, 1, 13),
            per_day: 0,
            output: output.clone(),
        })
        .await
        .expect("Crawl failed");

    assert_eq!(report.days, 0);
    let requests = server.received_requests().await.expect("Recording disabled");
    assert!(requests.is_empty());

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "datetime,link_url,archive_url\n"
    );
    assert_eq!(
        std::fs::read_to_string(&firsts_path).unwrap(),
        "url,first_appearance\n"
    );
}

#[tokio::test]
async fn test_timed_out_snapshot_contributes_nothing() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_day(
        &server,
        "/data/2017/01/13/index.htm",
        day_page_html(
            &base,
            &[
                "/data/2017/01/13/20170113_010000.htm",
                "/data/2017/01/13/20170113_020000.htm",
            ],
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/data/2017/01/13/20170113_010000.htm"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(snapshot_html(&["http://slow.com/"]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_snapshot(
        &server,
        "/data/2017/01/13/20170113_020000.htm",
        &["http://fast.com/"],
    )
    .await;

    let output = dir.path().join("links.csv");
    let mut config = create_test_config(&base, &dir);
    config.crawler.request_timeout = 1;
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let report = coordinator
        .run(&CrawlRequest {
            start: day(2017, 1, 13),
            end: day(2017, 1, 13),
            per_day: 0,
            output: output.clone(),
        })
        .await
        .expect("Crawl failed");

    assert_eq!(report.snapshots, 2);
    assert_eq!(report.snapshot_failures, 1);

    let (_, rows) = read_csv(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "http://fast.com/");
}

#[tokio::test]
async fn test_non_ascii_snapshot_href_does_not_abort_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_day(
        &server,
        "/data/2017/01/13/index.htm",
        day_page_html(
            &base,
            &[
                "/data/2017/01/13/café.htm",
                "/data/2017/01/13/20170113_020000.htm",
            ],
        ),
    )
    .await;
    mount_snapshot(
        &server,
        "/data/2017/01/13/20170113_020000.htm",
        &["http://dated.com/"],
    )
    .await;

    let output = dir.path().join("links.csv");
    let config = create_test_config(&base, &dir);
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let report = coordinator
        .run(&CrawlRequest {
            start: day(2017, 1, 13),
            end: day(2017, 1, 13),
            per_day: 0,
            output: output.clone(),
        })
        .await
        .expect("Crawl failed");

    // The odd snapshot is listed but undated and missing on the server
    assert_eq!(report.snapshots, 2);
    assert_eq!(report.snapshot_failures, 1);
    assert_eq!(report.distinct_urls, 1);

    let (_, rows) = read_csv(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "2017-01-13 02:00:00");
}

#[tokio::test]
async fn test_snapshot_fetches_respect_worker_limit() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    let snapshots: Vec<String> = (1..=6)
        .map(|h| format!("/data/2017/01/13/20170113_{:02}0000.htm", h))
        .collect();
    let snapshot_refs: Vec<&str> = snapshots.iter().map(String::as_str).collect();
    mount_day(
        &server,
        "/data/2017/01/13/index.htm",
        day_page_html(&base, &snapshot_refs),
    )
    .await;
    for snapshot in &snapshots {
        Mock::given(method("GET"))
            .and(path(snapshot.as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(snapshot_html(&["http://same.com/"]))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
    }

    let output = dir.path().join("links.csv");
    let mut config = create_test_config(&base, &dir);
    config.crawler.workers = 2;
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let started = Instant::now();
    let report = coordinator
        .run(&CrawlRequest {
            start: day(2017, 1, 13),
            end: day(2017, 1, 13),
            per_day: 0,
            output: output.clone(),
        })
        .await
        .expect("Crawl failed");
    let elapsed = started.elapsed();

    assert_eq!(report.snapshots, 6);
    assert_eq!(report.snapshot_failures, 0);
    assert_eq!(report.rows_written, 6);

    // Six delayed fetches two at a time take at least three rounds
    assert!(
        elapsed >= Duration::from_millis(900),
        "crawl finished in {:?}",
        elapsed
    );
}
