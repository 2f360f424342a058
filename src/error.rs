use axum::http::StatusCode;
use axum::Json;

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("unauthorized")]
    Unauthorized,

    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("mode must not be empty")]
    EmptyMode,

    #[error("questions must not be empty")]
    EmptyQuestions,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("generation failed: {0}")]
    Transport(String),

    #[error("could not parse model output: {0}")]
    Parse(String),

    #[error("record store error: {0}")]
    Persistence(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl PromptError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredential(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Transport(_) | Self::Persistence(_) => StatusCode::BAD_GATEWAY,
            Self::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl axum::response::IntoResponse for PromptError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
