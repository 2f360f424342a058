//! HTTP surface over the pipeline.

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;

use crate::error::PromptError;
use crate::modes::{self, CATEGORIES};
use crate::AppState;

mod generate;
mod records;

use generate::*;
use records::*;

const BODY_LIMIT: usize = 1024 * 1024;

/// Auth middleware: checks Bearer token if PROMPTCRAFT_API_KEY is configured.
async fn require_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, PromptError> {
    let Some(ref expected) = state.api_key else {
        return Ok(next.run(req).await);
    };

    let unauthorized = || PromptError::Unauthorized;

    let header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(unauthorized)?;

    let token = header.strip_prefix("Bearer ").ok_or_else(unauthorized)?;

    if token.as_bytes().ct_eq(expected.as_bytes()).into() {
        Ok(next.run(req).await)
    } else {
        Err(unauthorized())
    }
}

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(health))
        .route("/modes", get(list_modes));

    let protected = Router::new()
        .route("/credentials", put(set_credentials))
        .route("/optimize", post(do_optimize))
        .route("/explain", post(do_explain))
        .route("/research", post(do_research))
        .route("/extract", post(do_extract))
        .route("/prompts", post(log_prompt))
        .route("/prompts/{id}/explanation", post(save_explanation))
        .route("/prompts/{id}/research", post(save_research))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public
        .merge(protected)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let creds = state.credentials.snapshot();
    Json(serde_json::json!({
        "name": "promptcraft",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.ai.model,
        "uptime_secs": state.started_at.elapsed().as_secs(),
        "generation_configured": creds.has_generation(),
        "store_configured": creds.has_store(),
    }))
}

#[derive(Serialize)]
struct ModeEntry {
    key: &'static str,
    label: String,
    instruction: &'static str,
}

#[derive(Serialize)]
struct ModeCategory {
    name: &'static str,
    modes: Vec<ModeEntry>,
}

async fn list_modes() -> Json<serde_json::Value> {
    let categories: Vec<ModeCategory> = CATEGORIES
        .iter()
        .map(|&(name, keys)| ModeCategory {
            name,
            modes: keys
                .iter()
                .filter_map(|&key| {
                    modes::instruction_for(key).map(|instruction| ModeEntry {
                        key,
                        label: modes::label(key),
                        instruction,
                    })
                })
                .collect(),
        })
        .collect();
    Json(serde_json::json!({
        "default": modes::DEFAULT_MODE,
        "categories": categories,
    }))
}

#[derive(Deserialize)]
struct CredentialsBody {
    google_api_key: String,
    supabase_url: Option<String>,
    supabase_key: Option<String>,
}

async fn set_credentials(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<Json<serde_json::Value>, PromptError> {
    if body.google_api_key.trim().is_empty() {
        return Err(PromptError::Validation("google_api_key is required".into()));
    }
    state.credentials.set(
        &body.google_api_key,
        body.supabase_url.as_deref(),
        body.supabase_key.as_deref(),
    );
    let creds = state.credentials.snapshot();
    info!(store = creds.has_store(), "credentials updated");
    Ok(Json(serde_json::json!({
        "generation_configured": creds.has_generation(),
        "store_configured": creds.has_store(),
    })))
}
