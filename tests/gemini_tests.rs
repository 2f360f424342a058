use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use futures::StreamExt;
use parking_lot::Mutex;
use promptcraft::ai::{AiConfig, GeminiClient, Generator, Turn};
use promptcraft::config::Credentials;
use promptcraft::error::PromptError;

/// Serve `app` on an ephemeral local port and return its base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// One SSE event carrying a Gemini chunk with a single text part.
fn sse_chunk(text: &str) -> String {
    let v = serde_json::json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    });
    format!("data: {v}\r\n\r\n")
}

#[derive(Clone, Default)]
struct Seen {
    action: Arc<Mutex<Option<String>>>,
    key: Arc<Mutex<Option<String>>>,
    body: Arc<Mutex<Option<serde_json::Value>>>,
}

async fn fake_gemini(reply: &'static str, status: StatusCode) -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route(
            "/models/{action}",
            post(
                move |State(seen): State<Seen>,
                      Path(action): Path<String>,
                      headers: HeaderMap,
                      Json(body): Json<serde_json::Value>| async move {
                    *seen.action.lock() = Some(action);
                    *seen.key.lock() = headers
                        .get("x-goog-api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    *seen.body.lock() = Some(body);
                    (status, [("content-type", "text/event-stream")], reply).into_response()
                },
            ),
        )
        .with_state(seen.clone());
    (spawn(app).await, seen)
}

fn client(base: &str) -> GeminiClient {
    let cfg = AiConfig::new(base, "gemini-test").unwrap();
    let creds = Credentials { google_api_key: Some("g-key".into()), ..Default::default() };
    GeminiClient::from_credentials(&creds, &cfg).unwrap()
}

fn leak(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

#[tokio::test]
async fn fragments_arrive_in_order() {
    let reply = leak(format!(
        "{}{}{}",
        sse_chunk("You are "),
        sse_chunk("a senior "),
        sse_chunk("editor.")
    ));
    let (base, seen) = fake_gemini(reply, StatusCode::OK).await;

    let gen = client(&base);
    let mut stream = gen.generate_stream(vec![Turn::user("system"), Turn::user("Optimise this: hi")]);
    let mut fragments = vec![];
    while let Some(f) = stream.next().await {
        fragments.push(f.unwrap());
    }
    assert_eq!(fragments, vec!["You are ", "a senior ", "editor."]);

    assert_eq!(seen.action.lock().as_deref(), Some("gemini-test:streamGenerateContent"));
    assert_eq!(seen.key.lock().as_deref(), Some("g-key"));
    let body = seen.body.lock().clone().unwrap();
    assert_eq!(body["contents"].as_array().unwrap().len(), 2);
    assert_eq!(body["contents"][1]["role"], "user");
    assert_eq!(body["contents"][1]["parts"][0]["text"], "Optimise this: hi");
    assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn stream_is_lazy() {
    let (base, seen) = fake_gemini("", StatusCode::OK).await;
    let gen = client(&base);
    let stream = gen.generate_stream(vec![Turn::user("x")]);
    drop(stream);
    tokio::task::yield_now().await;
    assert!(seen.body.lock().is_none());
}

#[tokio::test]
async fn upstream_error_status_is_transport_error() {
    let (base, _) = fake_gemini(r#"{"error":{"message":"API key not valid"}}"#, StatusCode::BAD_REQUEST).await;
    let gen = client(&base);
    let mut stream = gen.generate_stream(vec![Turn::user("x")]);
    let first = stream.next().await.unwrap();
    match first {
        Err(PromptError::Transport(msg)) => assert!(msg.contains("API key not valid")),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn blocked_prompt_ends_stream_with_error() {
    let reply = leak(format!(
        "{}data: {}\n\n",
        sse_chunk("partial"),
        serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}})
    ));
    let (base, _) = fake_gemini(reply, StatusCode::OK).await;
    let gen = client(&base);
    let items: Vec<_> = gen.generate_stream(vec![Turn::user("x")]).collect().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_deref().unwrap(), "partial");
    assert!(matches!(items[1], Err(PromptError::Transport(_))));
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let gen = client("http://127.0.0.1:1");
    let items: Vec<_> = gen.generate_stream(vec![Turn::user("x")]).collect().await;
    assert_eq!(items.len(), 1);
    assert!(matches!(items[0], Err(PromptError::Transport(_))));
}
