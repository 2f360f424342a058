use axum::http::StatusCode;
use promptcraft::error::PromptError;

#[test]
fn status_codes_are_correct() {
    assert_eq!(
        PromptError::MissingCredential("google api key").status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(PromptError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(PromptError::EmptyPrompt.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(PromptError::EmptyMode.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(PromptError::EmptyQuestions.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(PromptError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        PromptError::Transport("timeout".into()).status_code(),
        StatusCode::BAD_GATEWAY,
    );
    assert_eq!(
        PromptError::Persistence("down".into()).status_code(),
        StatusCode::BAD_GATEWAY,
    );
    assert_eq!(
        PromptError::Parse("no json".into()).status_code(),
        StatusCode::UNPROCESSABLE_ENTITY,
    );
    assert_eq!(
        PromptError::Internal("oops".into()).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR,
    );
}

#[test]
fn error_messages_are_human_readable() {
    assert_eq!(PromptError::EmptyPrompt.to_string(), "prompt must not be empty");
    assert_eq!(
        PromptError::MissingCredential("google api key").to_string(),
        "missing credential: google api key"
    );
    assert!(PromptError::Transport("reset".into()).to_string().contains("reset"));
}

#[tokio::test]
async fn into_response_has_json_body() {
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;

    let resp = PromptError::EmptyQuestions.into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let j: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(j["error"], "questions must not be empty");
}
