use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::Notify;

use super::*;
use crate::api::HttpMethod;
use crate::core::types::{SearchPayload, SearchResult};
use crate::testing::{page_json, test_client, MockTransport, RecordingDialog, RecordingSink, Reply};

const SEARCH: &str = "/v2/search";

fn result(path: &str, score: f64) -> SearchResult {
    SearchResult {
        score,
        collection: "docs".to_string(),
        payload: SearchPayload {
            file_path: path.to_string(),
            text: "chunk".to_string(),
            start: 0,
            end: 5,
            chunk_index: 0,
        },
    }
}

fn session_with(dialog: Arc<RecordingDialog>) -> (Arc<MockTransport>, Arc<RecordingSink>, SearchSession) {
    let transport = MockTransport::new();
    let sink = RecordingSink::new();
    let session = SearchSession::new(test_client(transport.clone()), dialog, sink.clone());
    (transport, sink, session)
}

fn settings_of(session: &SearchSession) -> crate::config::SettingsStore {
    session.client().settings().clone()
}

fn session() -> (Arc<MockTransport>, SearchSession) {
    let (transport, _sink, session) = session_with(RecordingDialog::answering(None));
    (transport, session)
}

fn two_pages() -> serde_json::Value {
    page_json(vec![result("docs/a.txt", 0.9), result("docs/b.txt", 0.7)], 4, 1, 2, 2)
}

#[test]
fn test_initial_state() {
    let (_transport, session) = session();
    let state = session.state();
    assert!(state.results.is_empty());
    assert!(!state.searching);
    assert!(state.error.is_empty());
    assert_eq!(state.page, 1);
    assert_eq!(state.total_pages, 1);
    assert!(state.selected_collections.is_empty());
}

#[tokio::test]
async fn test_blank_query_does_nothing() {
    let (transport, session) = session();
    transport.on(HttpMethod::Post, SEARCH, Reply::Json(200, two_pages()));
    session.search("report", 2, 0.5, None).await;
    let before = session.state();

    session.search("", 2, 0.5, None).await;
    session.search("   ", 2, 0.5, None).await;

    assert_eq!(transport.request_count(), 1);
    assert_eq!(session.state(), before);
}

#[tokio::test]
async fn test_search_stores_results_and_pagination() {
    let (transport, session) = session();
    transport.on(HttpMethod::Post, SEARCH, Reply::Json(200, two_pages()));

    session.search("report", 2, 0.4, None).await;

    let state = session.state();
    assert_eq!(state.results.len(), 2);
    assert_eq!(state.total, 4);
    assert!(state.has_next);
    assert!(!state.searching);

    let body = transport.requests()[0].body.clone().unwrap();
    assert_eq!(body["query"], json!("report"));
    assert_eq!(body["limit"], json!(2));
    assert_eq!(body["page"], json!(1));
    assert_eq!(body["score_threshold"], json!(0.4));
}

#[tokio::test]
async fn test_selected_collections_are_sent() {
    let (transport, session) = session();
    transport.on(HttpMethod::Post, SEARCH, Reply::Json(200, two_pages()));
    settings_of(&session).set_search_all_collections(false);
    session.set_selected_collections(vec!["docs".to_string(), "notes".to_string()]);

    session.search("q", 20, 0.5, None).await;

    let body = transport.requests()[0].body.clone().unwrap();
    assert_eq!(body["collections"], json!(["docs", "notes"]));
}

#[tokio::test]
async fn test_search_all_setting_overrides_selection() {
    let (transport, session) = session();
    transport.on(HttpMethod::Post, SEARCH, Reply::Json(200, two_pages()));
    settings_of(&session).set_search_all_collections(true);
    session.set_selected_collections(vec!["docs".to_string()]);

    session.search("q", 20, 0.5, None).await;

    let body = transport.requests()[0].body.clone().unwrap();
    assert_eq!(body["collections"], json!(null));
}

#[tokio::test]
async fn test_empty_selection_searches_all() {
    let (transport, session) = session();
    transport.on(HttpMethod::Post, SEARCH, Reply::Json(200, two_pages()));
    settings_of(&session).set_search_all_collections(false);

    session.search("q", 20, 0.5, None).await;

    let body = transport.requests()[0].body.clone().unwrap();
    assert_eq!(body["collections"], json!(null));
}

#[tokio::test]
async fn test_page_argument_or_current_page() {
    let (transport, session) = session();
    transport.on(HttpMethod::Post, SEARCH, Reply::Json(200, two_pages()));

    session.search("q", 2, 0.5, None).await;
    session.next_page();
    session.search("q", 2, 0.5, None).await;
    session.search("q", 2, 0.5, Some(5)).await;
    session.search("q", 2, 0.5, Some(0)).await;

    let pages: Vec<_> = transport
        .requests()
        .iter()
        .map(|r| r.body.clone().unwrap()["page"].clone())
        .collect();
    // the reply always reports page 1, which resets the current page
    assert_eq!(pages, vec![json!(1), json!(2), json!(5), json!(1)]);
}

#[tokio::test]
async fn test_search_failure_is_captured() {
    let (transport, session) = session();
    transport.on(HttpMethod::Post, SEARCH, Reply::Json(422, json!({"detail": "query too long"})));

    session.search("q", 20, 0.5, None).await;

    let state = session.state();
    assert_eq!(state.error, "query too long");
    assert!(!state.searching);
    assert!(state.results.is_empty());
}

#[tokio::test]
async fn test_searching_is_set_while_in_flight() {
    let (transport, session) = session();
    let gate = Arc::new(Notify::new());
    transport.on(HttpMethod::Post, SEARCH, Reply::Gated(gate.clone(), Box::new(Reply::Json(200, two_pages()))));
    let mut rx = session.subscribe();

    let running = session.clone();
    let task = tokio::spawn(async move { running.search("q", 2, 0.5, None).await });

    rx.wait_for(|state| state.searching).await.unwrap();
    gate.notify_one();
    task.await.unwrap();
    assert!(!session.state().searching);
}

#[tokio::test]
async fn test_paging_is_local_only() {
    let (transport, session) = session();
    transport.on(HttpMethod::Post, SEARCH, Reply::Json(200, two_pages()));
    session.search("q", 2, 0.5, None).await;

    session.next_page();
    assert_eq!(session.state().page, 2);

    // flags come from the last fetched page, which had no previous page
    session.prev_page();
    assert_eq!(session.state().page, 2);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_next_page_saturates_at_last_page_number() {
    let (transport, session) = session();
    let mut body = page_json(vec![result("docs/a.txt", 0.9)], 1, u32::MAX, 20, u32::MAX);
    body["has_next"] = json!(true);
    transport.on(HttpMethod::Post, SEARCH, Reply::Json(200, body));
    session.search("q", 20, 0.5, Some(u32::MAX)).await;

    session.next_page();

    assert_eq!(session.state().page, u32::MAX);
}

#[tokio::test]
async fn test_clear_results_resets_pagination() {
    let (transport, session) = session();
    transport.on(HttpMethod::Post, SEARCH, Reply::Json(200, two_pages()));
    session.set_selected_collections(vec!["docs".to_string()]);
    session.search("q", 2, 0.5, None).await;

    session.clear_results();

    let state = session.state();
    assert!(state.results.is_empty());
    assert_eq!(state.page, 1);
    assert_eq!(state.total, 0);
    assert!(!state.has_next);
    assert_eq!(state.selected_collections, vec!["docs".to_string()]);
}

#[tokio::test]
async fn test_download_uses_bare_name_and_download_path() {
    let (transport, sink, session) = session_with(RecordingDialog::answering(Some("/tmp/saved.txt")));
    transport.on(HttpMethod::Get, "/v2/files/docs/report.txt", Reply::Bytes(200, b"body".to_vec()));

    session
        .download_file("docs", "nested/dir\\report.txt", Some("/home/me/Downloads"))
        .await
        .unwrap();

    assert_eq!(transport.requests()[0].path(), "/v2/files/docs/report.txt");
    assert_eq!(
        sink.writes.lock().clone(),
        vec![(PathBuf::from("/tmp/saved.txt"), b"body".to_vec())]
    );
}

#[tokio::test]
async fn test_download_without_path_suggests_name() {
    let dialog = RecordingDialog::answering(None);
    let (transport, sink, session) = session_with(dialog.clone());
    transport.on(HttpMethod::Get, "/v2/files/docs/a.txt", Reply::Bytes(200, b"x".to_vec()));

    session.download_file("docs", "docs/a.txt", None).await.unwrap();

    assert_eq!(dialog.asked.lock()[0].default_path, "a.txt");
    assert!(sink.writes.lock().is_empty());
}

#[tokio::test]
async fn test_download_with_path_suggests_joined_path() {
    let dialog = RecordingDialog::answering(None);
    let (transport, _sink, session) = session_with(dialog.clone());
    transport.on(HttpMethod::Get, "/v2/files/docs/a.txt", Reply::Bytes(200, b"x".to_vec()));

    session.download_file("docs", "a.txt", Some("/dl")).await.unwrap();

    assert_eq!(dialog.asked.lock()[0].default_path, "/dl/a.txt");
}

#[tokio::test]
async fn test_download_failure_is_returned() {
    let (transport, session) = session();
    transport.on(HttpMethod::Get, "/v2/files/docs/a.txt", Reply::Json(500, json!({"detail": "Download failed"})));

    let err = session.download_file("docs", "docs/a.txt", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Download failed");
}
