use crate::audio::AudioCacheError;
use crate::audit::AuditError;
use crate::config::ConfigError;
use crate::provider::ProviderError;
use crate::speech::SpeechScoreError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Validation(String),
    Audit(AuditError),
    Speech(SpeechScoreError),
    Provider(ProviderError),
    Audio(AudioCacheError),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Validation(message) => write!(f, "{}", message),
            AppError::Audit(err) => write!(f, "{}", err),
            AppError::Speech(err) => write!(f, "{}", err),
            AppError::Provider(err) => write!(f, "{}", err),
            AppError::Audio(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Validation(_) => None,
            AppError::Audit(err) => Some(err),
            AppError::Speech(err) => Some(err),
            AppError::Provider(err) => Some(err),
            AppError::Audio(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Audit(AuditError::TextTooShort)
            | AppError::Audit(AuditError::UnsupportedAudioMode) => StatusCode::BAD_REQUEST,
            AppError::Audio(AudioCacheError::InvalidFileName) => StatusCode::BAD_REQUEST,
            AppError::Audio(AudioCacheError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Audit(_)
            | AppError::Speech(_)
            | AppError::Provider(_)
            | AppError::Audio(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::warn!(%status, error = %self, "request rejected");
        }

        let body = match &self {
            AppError::Audit(AuditError::Formatting { raw })
            | AppError::Speech(SpeechScoreError::Formatting { raw }) => {
                Json(json!({ "error": self.to_string(), "raw": raw }))
            }
            _ => Json(json!({ "error": self.to_string() })),
        };

        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<AuditError> for AppError {
    fn from(value: AuditError) -> Self {
        Self::Audit(value)
    }
}

impl From<SpeechScoreError> for AppError {
    fn from(value: SpeechScoreError) -> Self {
        Self::Speech(value)
    }
}

impl From<ProviderError> for AppError {
    fn from(value: ProviderError) -> Self {
        Self::Provider(value)
    }
}

impl From<AudioCacheError> for AppError {
    fn from(value: AudioCacheError) -> Self {
        Self::Audio(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let response = AppError::validation("Text is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_audio_maps_to_not_found() {
        let response = AppError::Audio(AudioCacheError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn short_text_audit_is_a_client_error() {
        let response = AppError::Audit(AuditError::TextTooShort).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn provider_failure_is_a_logged_server_error_with_a_json_body() {
        let response = AppError::Provider(ProviderError::EmptyReply).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }
}
