use axum::extract::Multipart;
use learncomms::audio::AudioCache;
use learncomms::audit::QaAuditService;
use learncomms::error::AppError;
use learncomms::provider::{AudioUpload, GenerativeProvider};
use learncomms::speech::SpeechScoreService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) provider: Arc<dyn GenerativeProvider>,
    pub(crate) audits: Arc<QaAuditService>,
    pub(crate) speech: Arc<SpeechScoreService>,
    pub(crate) audio: AudioCache,
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) audits_served: Arc<AtomicU64>,
}

/// A fully drained multipart form: text fields by name plus at most one
/// uploaded file captured from the expected field.
pub(crate) struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<AudioUpload>,
}

impl UploadForm {
    pub(crate) fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub(crate) fn text_or(&self, name: &str, default: &str) -> String {
        self.text(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(default)
            .to_string()
    }

    pub(crate) fn take_file(&mut self) -> Option<AudioUpload> {
        self.file.take()
    }
}

/// Drain a multipart request, capturing the file from `file_field` and every
/// other part as a text field. Malformed parts surface as validation errors.
pub(crate) async fn collect_multipart(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<UploadForm, AppError> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::validation(format!("invalid multipart payload: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == file_field {
            let file_name = field
                .file_name()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or("upload.bin")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::validation(format!("failed to read upload: {err}")))?;
            file = Some(AudioUpload {
                file_name,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|err| AppError::validation(format!("failed to read field: {err}")))?;
            fields.insert(name, value);
        }
    }

    Ok(UploadForm { fields, file })
}
