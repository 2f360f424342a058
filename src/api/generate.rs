use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::Response;
use axum::Json;
use futures::StreamExt;
use serde::Deserialize;
use tracing::warn;

use crate::ai::{GeminiClient, TextStream};
use crate::error::PromptError;
use crate::{modes, pipeline, AppState};

fn default_mode() -> String {
    modes::DEFAULT_MODE.to_string()
}

/// Client for this request, built from a snapshot of the credentials.
fn generator(state: &AppState) -> Result<GeminiClient, PromptError> {
    GeminiClient::from_credentials(&state.credentials.snapshot(), &state.ai)
}

/// Waits for the first fragment so an upstream failure still gets a proper
/// status code; later failures can only cut the body short.
async fn stream_reply(mut stream: TextStream) -> Result<Response, PromptError> {
    let first = match stream.next().await {
        Some(Ok(fragment)) => Some(fragment),
        Some(Err(e)) => return Err(e),
        None => None,
    };

    let body = futures::stream::iter(first.map(Ok))
        .chain(stream)
        .inspect(|item| {
            if let Err(e) = item {
                warn!("stream aborted mid-body: {e}");
            }
        });

    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(body))
        .map_err(|e| PromptError::Internal(e.to_string()))
}

#[derive(Deserialize)]
pub(super) struct OptimizeBody {
    prompt: String,
    #[serde(default = "default_mode")]
    mode: String,
}

pub(super) async fn do_optimize(
    State(state): State<AppState>,
    Json(body): Json<OptimizeBody>,
) -> Result<Response, PromptError> {
    let gen = generator(&state)?;
    stream_reply(pipeline::optimize(&gen, &body.prompt, &body.mode)?).await
}

#[derive(Deserialize)]
pub(super) struct ExplainBody {
    original: String,
    optimized: String,
    #[serde(default = "default_mode")]
    mode: String,
}

pub(super) async fn do_explain(
    State(state): State<AppState>,
    Json(body): Json<ExplainBody>,
) -> Result<Response, PromptError> {
    let gen = generator(&state)?;
    stream_reply(pipeline::explain(&gen, &body.original, &body.optimized, &body.mode)?).await
}

#[derive(Deserialize)]
pub(super) struct ResearchBody {
    original: String,
    optimized: String,
    questions: String,
    preferences: Option<String>,
}

pub(super) async fn do_research(
    State(state): State<AppState>,
    Json(body): Json<ResearchBody>,
) -> Result<Response, PromptError> {
    let gen = generator(&state)?;
    let stream = pipeline::deep_research_answers(
        &gen,
        &body.original,
        &body.optimized,
        &body.questions,
        body.preferences.as_deref(),
    )?;
    stream_reply(stream).await
}
