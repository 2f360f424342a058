use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::error::PromptError;
use crate::extract::{parse_feedback, ExplanationFeedback};
use crate::store::{self, DeepResearchRecord, ExplanationRecord, PromptRecord};
use crate::AppState;

#[derive(Deserialize)]
pub(super) struct ExtractBody {
    text: String,
}

pub(super) async fn do_extract(
    Json(body): Json<ExtractBody>,
) -> Result<Json<ExplanationFeedback>, PromptError> {
    Ok(Json(parse_feedback(&body.text)?))
}

#[derive(Deserialize)]
pub(super) struct PromptBody {
    original_prompt: String,
    optimized_prompt: String,
    mode: String,
    model_used: Option<String>,
    session_id: Option<String>,
    user_location: Option<String>,
}

pub(super) async fn log_prompt(
    State(state): State<AppState>,
    Json(body): Json<PromptBody>,
) -> Json<serde_json::Value> {
    let record = PromptRecord::new(
        &body.original_prompt,
        &body.optimized_prompt,
        &body.mode,
        body.model_used.as_deref().unwrap_or(&state.ai.model),
        body.session_id.as_deref(),
        body.user_location.as_deref(),
    );
    let store = store::connect(&state.credentials.snapshot(), &state.ai.client);
    let prompt_id = store::log_prompt(store.as_ref(), record).await;
    Json(serde_json::json!({ "prompt_id": prompt_id }))
}

pub(super) async fn save_explanation(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
    Json(feedback): Json<ExplanationFeedback>,
) -> Json<serde_json::Value> {
    let record = ExplanationRecord { prompt_id, explanation_json: feedback };
    let store = store::connect(&state.credentials.snapshot(), &state.ai.client);
    store::save_explanation(store.as_ref(), record).await;
    Json(serde_json::json!({ "ok": true }))
}

#[derive(Deserialize)]
pub(super) struct ResearchRecordBody {
    questions_asked: String,
    preferences: Option<String>,
    answers: String,
}

pub(super) async fn save_research(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
    Json(body): Json<ResearchRecordBody>,
) -> Result<Json<serde_json::Value>, PromptError> {
    if body.questions_asked.trim().is_empty() {
        return Err(PromptError::EmptyQuestions);
    }
    let record = DeepResearchRecord {
        prompt_id,
        questions_asked: body.questions_asked,
        preferences: body.preferences.filter(|p| !p.trim().is_empty()),
        answers: body.answers,
    };
    let store = store::connect(&state.credentials.snapshot(), &state.ai.client);
    store::save_deep_research(store.as_ref(), record).await;
    Ok(Json(serde_json::json!({ "ok": true })))
}
