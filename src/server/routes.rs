//! Route handlers

use super::error::ApiError;
use super::AppState;
use crate::domain::MaskingResponse;
use crate::pipeline::MaskRequest;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

const USAGE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Veil</title></head>
<body>
<h1>Veil PII masking</h1>
<form method="post" action="/mask">
  <textarea name="text" rows="8" cols="80" placeholder="Text to mask"></textarea><br>
  <input type="text" name="language" value="en" size="4">
  <button type="submit">Mask</button>
</form>
<p>JSON clients: <code>POST /api/mask</code> with
<code>{"text": "...", "language": "en", "entities": ["PERSON"], "strategies": {"PERSON": {"type": "hash"}}}</code></p>
</body>
</html>
"#;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub entities: Vec<&'static str>,
}

/// Form-encoded masking request
#[derive(Debug, Default, Deserialize)]
pub struct MaskForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(USAGE_PAGE)
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let entities = state
        .pipeline
        .analyzer()
        .registry()
        .registered_entities()
        .into_iter()
        .map(|entity| entity.label())
        .collect();

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            entities,
        }),
    )
}

/// `POST /mask`
///
/// A body that is missing or not form-encoded counts as no text.
pub async fn mask_form(
    State(state): State<AppState>,
    form: Result<Form<MaskForm>, FormRejection>,
) -> Result<Json<MaskingResponse>, ApiError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(status = rejection.status().as_u16(), "Form body rejected");
            MaskForm::default()
        }
    };

    let mut request = MaskRequest::new(form.text);
    request.language = form.language;
    run_pipeline(state, request).await
}

/// `POST /api/mask`
pub async fn mask_json(
    State(state): State<AppState>,
    request: Result<Json<MaskRequest>, JsonRejection>,
) -> Result<Json<MaskingResponse>, ApiError> {
    let Json(request) = request?;
    run_pipeline(state, request).await
}

async fn run_pipeline(
    state: AppState,
    request: MaskRequest,
) -> Result<Json<MaskingResponse>, ApiError> {
    request.validate(state.max_text_chars)?;

    let pipeline = state.pipeline.clone();
    let response = tokio::task::spawn_blocking(move || pipeline.mask(&request))
        .await
        .map_err(|_| ApiError::Internal)??;

    Ok(Json(response))
}
