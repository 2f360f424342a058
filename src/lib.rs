pub mod ai;
pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod modes;
pub mod pipeline;
pub mod prompts;
pub mod store;
pub mod util;

#[derive(Clone)]
pub struct AppState {
    pub ai: ai::AiConfig,
    pub credentials: config::CredentialRegistry,
    pub api_key: Option<String>,
    pub started_at: std::time::Instant,
}
