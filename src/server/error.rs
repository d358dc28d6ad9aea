//! HTTP error responses
//!
//! Every failure is rendered as `{"error": message, "kind": kind}`. Faults in
//! server configuration are reported with a generic message; the detailed
//! error only goes to the log, and never includes the submitted text.

use crate::domain::{PipelineError, VeilError};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

const INTERNAL_MESSAGE: &str = "Failed to process text";

/// Error body returned to clients
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

/// Failure of one HTTP request
#[derive(Debug)]
pub enum ApiError {
    /// Request rejected before reaching the pipeline
    Validation(String),
    /// Analyzer or anonymizer failure
    Pipeline(PipelineError),
    /// Worker task panicked or was cancelled
    Internal,
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl From<VeilError> for ApiError {
    fn from(err: VeilError) -> Self {
        match err {
            VeilError::Validation(message) => ApiError::Validation(message),
            VeilError::Pipeline(inner) => ApiError::Pipeline(inner),
            other => {
                crate::log_error_with_context!(&other, "Request failed");
                ApiError::Internal
            }
        }
    }
}

// Serde messages can quote values from the body, so they are not forwarded
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::JsonDataError(_) => {
                "Request body has unknown or mistyped fields (text, language, entities, strategies)"
            }
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with Content-Type: application/json"
            }
            _ => "Failed to read request body",
        };
        ApiError::Validation(message.to_string())
    }
}

impl ApiError {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            ApiError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message.clone(),
                    kind: None,
                },
            ),
            ApiError::Pipeline(err) if err.is_client_error() => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: err.to_string(),
                    kind: Some(err.kind()),
                },
            ),
            ApiError::Pipeline(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: INTERNAL_MESSAGE.to_string(),
                    kind: Some(err.kind()),
                },
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: INTERNAL_MESSAGE.to_string(),
                    kind: None,
                },
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();

        match &self {
            ApiError::Pipeline(err) if status.is_server_error() => {
                crate::log_error_with_context!(err, "Masking pipeline failed");
            }
            ApiError::Internal => {
                tracing::error!("Masking task did not complete");
            }
            _ => {
                tracing::debug!(status = status.as_u16(), error = %body.error, "Request rejected");
            }
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityType;

    #[test]
    fn test_validation_is_bad_request_without_kind() {
        let (status, body) = ApiError::Validation("No text provided".into()).status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"error": "No text provided"})
        );
    }

    #[test]
    fn test_client_pipeline_errors_are_bad_request() {
        let (status, body) =
            ApiError::from(PipelineError::UnsupportedLanguage("fr".into())).status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.kind, Some("UnsupportedLanguageError"));
        assert_eq!(body.error, "Unsupported language: fr");
    }

    #[test]
    fn test_configuration_faults_are_generic() {
        let err = PipelineError::InvalidSpan {
            start: 3,
            end: 90,
            text_len: 10,
            reason: "span ends past the end of the text",
        };
        let (status, body) = ApiError::from(err).status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, INTERNAL_MESSAGE);
        assert_eq!(body.kind, Some("InvalidSpanError"));

        let (status, body) =
            ApiError::from(PipelineError::NoStrategy(EntityType::Person)).status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.kind, Some("NoStrategyError"));
    }

    #[test]
    fn test_veil_error_conversion() {
        assert!(matches!(
            ApiError::from(VeilError::Validation("x".into())),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from(VeilError::Server("bind".into())),
            ApiError::Internal
        ));
    }

    #[tokio::test]
    async fn test_json_rejections_become_validation_errors() {
        use axum::body::Body;
        use axum::extract::FromRequest;
        use axum::http::{header, Request};

        async fn reject(content_type: Option<&str>, body: &'static str) -> ApiError {
            let mut builder = Request::post("/api/mask");
            if let Some(content_type) = content_type {
                builder = builder.header(header::CONTENT_TYPE, content_type);
            }
            let request = builder.body(Body::from(body)).unwrap();
            let rejection = Json::<crate::pipeline::MaskRequest>::from_request(request, &())
                .await
                .unwrap_err();
            ApiError::from(rejection)
        }

        let (status, body) = reject(Some("application/json"), "{bad")
            .await
            .status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Request body is not valid JSON");

        let err = reject(
            Some("application/json"),
            r#"{"text":"x","entities":"Jane Roe"}"#,
        )
        .await;
        let (_, body) = err.status_and_body();
        assert!(!body.error.contains("Jane"));

        let (_, body) = reject(None, "{}").await.status_and_body();
        assert_eq!(
            body.error,
            "Expected request with Content-Type: application/json"
        );
    }
}
