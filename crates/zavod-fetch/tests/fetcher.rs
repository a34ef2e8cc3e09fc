//! Integration tests for `ReferenceFetcher` against a mocked Apify API.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zavod_fetch::{ApifyClient, FetchError, FetchOptions, ReferenceFetcher, ReferenceSource};

const RUNS_PATH: &str = "/acts/streamers~youtube-scraper/runs";

fn options(queries: &[&str]) -> FetchOptions {
    FetchOptions {
        queries: queries.iter().map(ToString::to_string).collect(),
        max_queries: queries.len(),
        max_results_per_query: 10,
        max_age_days: 90,
        skip_recency_filter: false,
        default_missing_publish_date: false,
    }
}

fn fetcher(server: &MockServer, options: FetchOptions) -> ReferenceFetcher {
    let client = ApifyClient::with_base_url("test-token", 30, &server.uri())
        .unwrap()
        .with_polling(Duration::from_millis(5), Duration::from_millis(500));
    ReferenceFetcher::new(client, options)
}

fn days_ago(days: i64) -> String {
    (Utc::now() - ChronoDuration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

async fn mount_run(server: &MockServer, input_match: Value, run_id: &str, items: Value) {
    let dataset_id = format!("ds-{run_id}");
    Mock::given(method("POST"))
        .and(path(RUNS_PATH))
        .and(body_partial_json(input_match))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"id": run_id, "status": "READY", "defaultDatasetId": dataset_id}
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/actor-runs/{run_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": run_id, "status": "SUCCEEDED", "defaultDatasetId": dataset_id}
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/datasets/{dataset_id}/items")))
        .respond_with(ResponseTemplate::new(200).set_body_json(items))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_all_merges_queries_and_dedups_by_normalized_url() {
    let server = MockServer::start().await;
    mount_run(
        &server,
        json!({"searchKeywords": "q1"}),
        "run-q1",
        json!([
            {"url": "https://www.youtube.com/watch?v=aaa&t=1", "title": "A", "uploadDate": days_ago(3)},
            {"url": "https://www.youtube.com/watch?v=bbb", "title": "B", "uploadDate": days_ago(5)}
        ]),
    )
    .await;
    mount_run(
        &server,
        json!({"searchKeywords": "q2"}),
        "run-q2",
        json!([
            {"url": "https://youtu.be/aaa", "title": "A again", "uploadDate": days_ago(3)},
            {"videoUrl": "https://www.youtube.com/watch?v=ccc", "title": "C", "publishedAt": days_ago(1)}
        ]),
    )
    .await;

    let refs = fetcher(&server, options(&["q1", "q2"]))
        .fetch_all()
        .await
        .expect("fetch should succeed");

    let titles: Vec<&str> = refs.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn fetch_all_respects_max_queries() {
    let server = MockServer::start().await;
    mount_run(
        &server,
        json!({"searchKeywords": "q1"}),
        "run-q1",
        json!([{"url": "https://youtu.be/one", "uploadDate": days_ago(1)}]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(RUNS_PATH))
        .and(body_partial_json(json!({"searchKeywords": "q2"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut opts = options(&["q1", "q2"]);
    opts.max_queries = 1;
    let refs = fetcher(&server, opts).fetch_all().await.unwrap();
    assert_eq!(refs.len(), 1);
}

#[tokio::test]
async fn fetch_all_drops_stale_items_unless_recency_filter_is_skipped() {
    let server = MockServer::start().await;
    mount_run(
        &server,
        json!({"searchKeywords": "q1"}),
        "run-q1",
        json!([
            {"url": "https://youtu.be/new", "uploadDate": days_ago(10)},
            {"url": "https://youtu.be/old", "uploadDate": days_ago(400)}
        ]),
    )
    .await;

    let filtered = fetcher(&server, options(&["q1"])).fetch_all().await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].url, "https://youtu.be/new");

    let mut opts = options(&["q1"]);
    opts.skip_recency_filter = true;
    let unfiltered = fetcher(&server, opts).fetch_all().await.unwrap();
    assert_eq!(unfiltered.len(), 2);
}

#[tokio::test]
async fn fetch_all_skips_failed_query_but_keeps_others() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUNS_PATH))
        .and(body_partial_json(json!({"searchKeywords": "broken"})))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    mount_run(
        &server,
        json!({"searchKeywords": "q1"}),
        "run-q1",
        json!([{"url": "https://youtu.be/ok", "uploadDate": days_ago(1)}]),
    )
    .await;

    let refs = fetcher(&server, options(&["broken", "q1"]))
        .fetch_all()
        .await
        .expect("one successful query is enough");
    assert_eq!(refs.len(), 1);
}

#[tokio::test]
async fn fetch_all_fails_when_every_query_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUNS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = fetcher(&server, options(&["q1", "q2"]))
        .fetch_all()
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Http(_)), "got: {err:?}");
}

#[tokio::test]
async fn fetch_one_uses_direct_lookup_first() {
    let server = MockServer::start().await;
    mount_run(
        &server,
        json!({"startUrls": [{"url": "https://youtu.be/target"}]}),
        "run-direct",
        json!([{
            "url": "https://www.youtube.com/watch?v=target",
            "title": "Direct hit",
            "uploadDate": days_ago(900)
        }]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(RUNS_PATH))
        .and(body_partial_json(json!({"searchKeywords": "q1"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let found = fetcher(&server, options(&["q1"]))
        .fetch_one("https://youtu.be/target")
        .await
        .unwrap()
        .expect("direct lookup should find the video");
    assert_eq!(found.title, "Direct hit");
}

#[tokio::test]
async fn fetch_one_falls_back_to_search_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUNS_PATH))
        .and(body_partial_json(json!({"maxResults": 1})))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_run(
        &server,
        json!({"searchKeywords": "q1"}),
        "run-q1",
        json!([
            {"url": "https://www.youtube.com/watch?v=other", "title": "Other", "uploadDate": days_ago(1)},
            {"url": "https://www.youtube.com/watch?v=wanted&feature=share", "title": "Wanted", "uploadDate": days_ago(2)}
        ]),
    )
    .await;

    let found = fetcher(&server, options(&["q1"]))
        .fetch_one("https://youtu.be/wanted")
        .await
        .unwrap()
        .expect("fallback scan should match the normalized url");
    assert_eq!(found.title, "Wanted");
}

#[tokio::test]
async fn fetch_one_returns_none_when_nothing_matches() {
    let server = MockServer::start().await;
    mount_run(
        &server,
        json!({"maxResults": 1}),
        "run-direct",
        json!([]),
    )
    .await;
    mount_run(
        &server,
        json!({"searchKeywords": "q1"}),
        "run-q1",
        json!([{"url": "https://youtu.be/unrelated", "uploadDate": days_ago(1)}]),
    )
    .await;

    let found = fetcher(&server, options(&["q1"]))
        .fetch_one("https://youtu.be/missing")
        .await
        .unwrap();
    assert!(found.is_none());
}
