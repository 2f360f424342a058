//! Best-effort audit log of prompts, explanations and research answers.
//!
//! The store is a convenience, never a dependency: the gateway functions at
//! the bottom of this module log failures and return nothing rather than an
//! error, so optimize / explain / research succeed with the store down or
//! unconfigured.

use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{info, warn};

use crate::config::Credentials;
use crate::error::PromptError;
use crate::extract::ExplanationFeedback;
use crate::util::log_preview;

pub const PROMPTS_TABLE: &str = "optimized_prompts";
pub const DEEP_RESEARCH_TABLE: &str = "deep_research_questions";
pub const EXPLANATIONS_TABLE: &str = "prompt_explanations";

pub const DEFAULT_LOCATION: &str = "global";

fn store_err(msg: impl Into<String>) -> PromptError {
    PromptError::Persistence(msg.into())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRecord {
    pub original_prompt: String,
    pub optimized_prompt: String,
    pub mode: String,
    pub model_used: String,
    pub timestamp: String,
    pub session_id: String,
    pub user_location: String,
}

impl PromptRecord {
    /// Stamps the current time and, unless one is given, a fresh session id.
    pub fn new(
        original_prompt: &str,
        optimized_prompt: &str,
        mode: &str,
        model_used: &str,
        session_id: Option<&str>,
        user_location: Option<&str>,
    ) -> Self {
        Self {
            original_prompt: original_prompt.to_string(),
            optimized_prompt: optimized_prompt.to_string(),
            mode: mode.to_string(),
            model_used: model_used.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            session_id: session_id
                .map(str::to_string)
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            user_location: user_location.unwrap_or(DEFAULT_LOCATION).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepResearchRecord {
    pub prompt_id: String,
    pub questions_asked: String,
    pub preferences: Option<String>,
    pub answers: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationRecord {
    pub prompt_id: String,
    pub explanation_json: ExplanationFeedback,
}

/// Keyed inserts into an external store.
pub trait RecordStore: Send + Sync {
    /// Returns the generated id of the new row.
    fn insert_prompt(
        &self,
        record: &PromptRecord,
    ) -> impl Future<Output = Result<String, PromptError>> + Send;

    fn insert_deep_research(
        &self,
        record: &DeepResearchRecord,
    ) -> impl Future<Output = Result<(), PromptError>> + Send;

    fn insert_explanation(
        &self,
        record: &ExplanationRecord,
    ) -> impl Future<Output = Result<(), PromptError>> + Send;
}

/// Supabase's PostgREST endpoint.
#[derive(Clone)]
pub struct SupabaseStore {
    url: String,
    key: String,
    client: reqwest::Client,
}

impl SupabaseStore {
    /// Needs both the store URL and key.
    pub fn from_credentials(
        creds: &Credentials,
        client: &reqwest::Client,
    ) -> Result<Self, PromptError> {
        let (Some(url), Some(key)) = (&creds.supabase_url, &creds.supabase_key) else {
            return Err(PromptError::MissingCredential("supabase url and key"));
        };
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.clone(),
            client: client.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.url)
    }

    async fn insert<T: Serialize + Sync>(
        &self,
        table: &str,
        row: &T,
        prefer: &str,
    ) -> Result<reqwest::Response, PromptError> {
        let resp = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
            .header("Prefer", prefer)
            .json(&[row])
            .send()
            .await
            .map_err(|e| store_err(format!("{table} insert failed: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(store_err(format!("{table} returned {status}: {}", log_preview(&body, 300))));
        }
        Ok(resp)
    }
}

/// `id` may come back as a number or a string depending on the column type.
fn first_id(rows: &serde_json::Value) -> Option<String> {
    let id = rows.get(0)?.get("id")?;
    match id {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl RecordStore for SupabaseStore {
    async fn insert_prompt(&self, record: &PromptRecord) -> Result<String, PromptError> {
        let resp = self
            .insert(PROMPTS_TABLE, record, "return=representation")
            .await?;
        let rows: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| store_err(format!("{PROMPTS_TABLE} response parse failed: {e}")))?;
        first_id(&rows).ok_or_else(|| store_err("no row returned from prompt insert"))
    }

    async fn insert_deep_research(&self, record: &DeepResearchRecord) -> Result<(), PromptError> {
        self.insert(DEEP_RESEARCH_TABLE, record, "return=minimal").await?;
        Ok(())
    }

    async fn insert_explanation(&self, record: &ExplanationRecord) -> Result<(), PromptError> {
        self.insert(EXPLANATIONS_TABLE, record, "return=minimal").await?;
        Ok(())
    }
}

/// Build a store from the current credentials, or log why not.
pub fn connect(creds: &Credentials, client: &reqwest::Client) -> Option<SupabaseStore> {
    match SupabaseStore::from_credentials(creds, client) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!("record store unavailable: {e}");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// gateway: never returns an error
// ---------------------------------------------------------------------------

/// Returns the new prompt id, or `None` if it couldn't be stored.
pub async fn log_prompt<S: RecordStore>(store: Option<&S>, record: PromptRecord) -> Option<String> {
    let Some(store) = store else {
        warn!("prompt not logged: no record store");
        return None;
    };
    match store.insert_prompt(&record).await {
        Ok(id) => {
            info!(prompt_id = %id, mode = %record.mode, "prompt logged");
            Some(id)
        }
        Err(e) => {
            warn!("failed to insert prompt: {e}");
            None
        }
    }
}

pub async fn save_deep_research<S: RecordStore>(store: Option<&S>, record: DeepResearchRecord) {
    let Some(store) = store else {
        warn!(prompt_id = %record.prompt_id, "deep research answers not saved: no record store");
        return;
    };
    match store.insert_deep_research(&record).await {
        Ok(()) => info!(prompt_id = %record.prompt_id, "deep research answers saved"),
        Err(e) => warn!(prompt_id = %record.prompt_id, "deep research save failed: {e}"),
    }
}

pub async fn save_explanation<S: RecordStore>(store: Option<&S>, record: ExplanationRecord) {
    let Some(store) = store else {
        warn!(prompt_id = %record.prompt_id, "explanation not saved: no record store");
        return;
    };
    match store.insert_explanation(&record).await {
        Ok(()) => info!(prompt_id = %record.prompt_id, "explanation saved"),
        Err(e) => warn!(prompt_id = %record.prompt_id, "explanation save failed: {e}"),
    }
}
