//! End-to-end checks: form controller -> relay server -> Gemini client -> fake Gemini.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use yt_transcript_relay::client::{
    Clipboard, ClipboardError, FormController, HttpRelayClient, MemoryResultStore,
};
use yt_transcript_relay::config::StaticCredential;
use yt_transcript_relay::relay::metadata::{CONFIDENCE_SCORES, DURATIONS, LANGUAGES};
use yt_transcript_relay::relay::ErrorBody;
use yt_transcript_relay::server::router;
use yt_transcript_relay::{GeminiProvider, TranscriptRelay, TranscriptResult};

#[derive(Clone)]
struct FakeGemini {
    status: StatusCode,
    body: Value,
    calls: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

async fn generate(
    State(fake): State<FakeGemini>,
    Path(action): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(request): Json<Value>,
) -> (StatusCode, Json<Value>) {
    fake.calls
        .lock()
        .unwrap()
        .push((action, query.get("key").cloned(), request));
    (fake.status, Json(fake.body.clone()))
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

struct Harness {
    relay_url: String,
    calls: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

async fn harness(status: StatusCode, body: Value, credentials: StaticCredential) -> Harness {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeGemini {
        status,
        body,
        calls: calls.clone(),
    };
    let gemini = spawn(
        Router::new()
            .route("/v1beta/models/:action", post(generate))
            .with_state(fake),
    )
    .await;

    let provider = GeminiProvider::new(format!("http://{gemini}/v1beta"), "gemini-2.0-flash-exp");
    let relay = TranscriptRelay::new(Arc::new(provider), Arc::new(credentials));
    let relay_addr = spawn(router(relay)).await;

    Harness {
        relay_url: format!("http://{relay_addr}"),
        calls,
    }
}

fn transcript_body(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
}

async fn post_raw(relay_url: &str, body: Value) -> (u16, String) {
    let response = reqwest::Client::new()
        .post(format!("{relay_url}/api/extract-transcript"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.text().await.unwrap())
}

struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&self, _: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError("headless".to_string()))
    }
}

#[tokio::test]
async fn test_transcript_flows_through_to_the_form() {
    let h = harness(StatusCode::OK, transcript_body("hello world"), StaticCredential::new("k3y")).await;

    let mut form = FormController::new(Box::new(HttpRelayClient::new(&h.relay_url)), Box::new(NoClipboard))
        .with_store(Box::new(MemoryResultStore::new()));
    form.set_url(" https://www.youtube.com/watch?v=dQw4w9WgXcQ ");
    form.submit().await;

    assert_eq!(form.error(), None);
    let result = form.result().unwrap();
    assert_eq!(result.text, "hello world");
    assert!(DURATIONS.contains(&result.duration.as_str()));
    assert!(LANGUAGES.contains(&result.language.as_str()));
    assert!(CONFIDENCE_SCORES.contains(&result.confidence.as_str()));
    assert_eq!(form.word_count(), 2);

    let calls = h.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (action, key, request) = &calls[0];
    assert_eq!(action, "gemini-2.0-flash-exp:generateContent");
    assert_eq!(key.as_deref(), Some("k3y"));
    assert_eq!(
        request["contents"][0]["parts"][1]["file_data"]["file_uri"],
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
    );
    assert!(request["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Transcribe the video."));
}

#[tokio::test]
async fn test_provider_error_body_is_not_echoed() {
    let h = harness(
        StatusCode::FORBIDDEN,
        json!({ "error": { "message": "API key leaked-detail is invalid" } }),
        StaticCredential::new("k3y"),
    )
    .await;

    let (status, body) = post_raw(&h.relay_url, json!({ "url": "https://youtu.be/dQw4w9WgXcQ" })).await;

    assert_eq!(status, 500);
    assert!(!body.contains("leaked-detail"));
    let error: ErrorBody = serde_json::from_str(&body).unwrap();
    assert_eq!(error.error, "Failed to extract transcript from video");
}

#[tokio::test]
async fn test_missing_candidates_is_server_error() {
    let h = harness(
        StatusCode::OK,
        json!({ "promptFeedback": { "blockReason": "OTHER" } }),
        StaticCredential::new("k3y"),
    )
    .await;

    let (status, body) = post_raw(&h.relay_url, json!({ "url": "youtu.be/abc" })).await;

    assert_eq!(status, 500);
    assert!(!body.contains("blockReason"));
    assert_eq!(
        serde_json::from_str::<ErrorBody>(&body).unwrap().error,
        "No transcript found in video"
    );
}

#[tokio::test]
async fn test_rejections_never_reach_the_provider() {
    let h = harness(StatusCode::OK, transcript_body("unused"), StaticCredential::new("k3y")).await;

    let (status, _) = post_raw(&h.relay_url, json!({})).await;
    assert_eq!(status, 400);

    let (status, body) = post_raw(&h.relay_url, json!({ "url": "https://vimeo.com/12345" })).await;
    assert_eq!(status, 400);
    assert_eq!(serde_json::from_str::<ErrorBody>(&body).unwrap().error, "Invalid YouTube URL");

    assert!(h.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_credential_never_reaches_the_provider() {
    let h = harness(StatusCode::OK, transcript_body("unused"), StaticCredential::missing()).await;

    let mut form = FormController::new(Box::new(HttpRelayClient::new(&h.relay_url)), Box::new(NoClipboard));
    form.set_url("https://youtu.be/dQw4w9WgXcQ");
    form.submit().await;

    assert_eq!(form.error(), Some("API key not configured"));
    assert!(form.result().is_none());
    assert!(h.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_repeated_requests_return_the_same_text() {
    let h = harness(StatusCode::OK, transcript_body("same every time"), StaticCredential::new("k3y")).await;

    let mut results: Vec<TranscriptResult> = Vec::new();
    for _ in 0..3 {
        let (status, body) = post_raw(&h.relay_url, json!({ "url": "youtu.be/abc" })).await;
        assert_eq!(status, 200);
        results.push(serde_json::from_str(&body).unwrap());
    }

    assert!(results.iter().all(|r| r.text == "same every time"));
    assert_eq!(h.calls.lock().unwrap().len(), 3);
}
