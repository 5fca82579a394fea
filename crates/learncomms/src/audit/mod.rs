//! QA audit pipeline: resolve parameters, bind rubrics, request an
//! evaluation, and reconcile the untrusted reply onto the canonical schema.

mod prompt;
mod reconcile;
mod resolver;
mod schema;

pub use prompt::AuditPrompt;
pub use reconcile::{
    normalize_name, reconcile, recompute_scores, ActionItem, CategoryScores, ParameterScore,
    RawAuditReply, RawParameterScore, ReconciledScores, NEUTRAL_SCORE, REASON_MAX_CHARS,
};
pub use resolver::{
    bind_rubrics, resolve_parameters, GuideState, ResolvedParameters, RubricBundle, RubricState,
    GUIDE_THRESHOLD,
};
pub use schema::{Category, InvalidMode, Mode, ParameterSet, ParamsCount};

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::provider::{AudioUpload, CompletionRequest, GenerativeProvider, ProviderError};

/// Minimum subject length for a text audit.
pub const MIN_TEXT_CHARS: usize = 30;

/// Bounds on advisory list sizes in the response.
pub const MAX_ERRORS: usize = 15;
pub const MAX_FEEDBACK: usize = 10;
pub const MAX_ACTION_PLAN: usize = 7;

/// Validated inputs for a text audit.
#[derive(Debug, Clone, Default)]
pub struct AuditRequest {
    pub evaluator_name: String,
    pub agent_name: String,
    pub params_state: Option<GuideState>,
    pub rubrics_state: Option<RubricState>,
}

/// Diagnostic metadata attached to every audit response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMeta {
    pub using_guide: bool,
    #[serde(rename = "invalidParamsReturnedByAI")]
    pub invalid_params_returned_by_ai: Vec<String>,
    pub params_count: ParamsCount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_audio_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<usize>,
}

/// Final audit payload. Aggregates are always derived from the reconciled
/// parameter scores, never taken from the upstream reply.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub mode: Mode,
    pub final_score: u8,
    pub category_scores: CategoryScores,
    pub parameter_scores: Vec<ParameterScore>,
    pub errors: Vec<String>,
    pub feedback: Vec<String>,
    pub action_plan: Vec<ActionItem>,
    pub meta: AuditMeta,
}

/// Audio audit payload: the transcript plus a regular audit result.
#[derive(Debug, Clone, Serialize)]
pub struct AudioAuditResult {
    pub transcript: String,
    #[serde(flatten)]
    pub audit: AuditResult,
}

/// Error enumeration for the audit pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("text too short, please paste the complete transcript/chat/email")]
    TextTooShort,
    #[error("audio audit currently supports only call mode")]
    UnsupportedAudioMode,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("AI returned invalid JSON")]
    Formatting { raw: String },
}

/// Service facade running the full audit pipeline against a provider.
pub struct QaAuditService {
    provider: Arc<dyn GenerativeProvider>,
}

impl QaAuditService {
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        Self { provider }
    }

    /// Score a transcript/chat/email against the resolved parameters.
    pub async fn audit_text(
        &self,
        mode: Mode,
        text: &str,
        request: &AuditRequest,
    ) -> Result<AuditResult, AuditError> {
        if text.trim().chars().count() < MIN_TEXT_CHARS {
            return Err(AuditError::TextTooShort);
        }

        self.evaluate(mode, text.trim(), request).await
    }

    /// Transcribe an uploaded call recording, then run the text audit over
    /// the transcript. An empty transcript short-circuits into a guidance
    /// payload instead of failing.
    pub async fn audit_audio(
        &self,
        mode: Mode,
        upload: AudioUpload,
        request: &AuditRequest,
    ) -> Result<AudioAuditResult, AuditError> {
        if mode != Mode::Call {
            return Err(AuditError::UnsupportedAudioMode);
        }

        let file_name = upload.file_name.clone();
        let size_bytes = upload.bytes.len();

        let transcript = self.provider.transcribe(upload).await?.trim().to_string();
        if transcript.is_empty() {
            return Ok(empty_transcript_fallback());
        }

        let mut audit = self.evaluate(mode, &transcript, request).await?;
        audit.meta.received_audio_name = Some(file_name);
        audit.meta.size_bytes = Some(size_bytes);

        Ok(AudioAuditResult { transcript, audit })
    }

    async fn evaluate(
        &self,
        mode: Mode,
        text: &str,
        request: &AuditRequest,
    ) -> Result<AuditResult, AuditError> {
        let resolved = resolve_parameters(request.params_state.as_ref(), mode);
        let rubrics = bind_rubrics(request.rubrics_state.as_ref(), mode, &resolved);
        let prompt = AuditPrompt::build(
            mode,
            text,
            &request.evaluator_name,
            &request.agent_name,
            &resolved,
            &rubrics,
        );

        let raw = self
            .provider
            .complete(
                CompletionRequest::new(prompt.user)
                    .with_system(prompt.system)
                    .with_temperature(0.2)
                    .expecting_json(),
            )
            .await?;

        let reply: RawAuditReply = match serde_json::from_str(raw.trim()) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(%err, raw, "audit reply was not parseable JSON");
                return Err(AuditError::Formatting { raw });
            }
        };

        Ok(assemble(mode, &resolved, reply))
    }
}

/// Package a reconciled reply into the final response shape, truncating the
/// advisory lists to their bounds.
pub fn assemble(mode: Mode, resolved: &ResolvedParameters, reply: RawAuditReply) -> AuditResult {
    let reconciled = reconcile(&reply.parameter_scores, &resolved.parameters);

    let mut errors = reply.errors;
    errors.truncate(MAX_ERRORS);
    let mut feedback = reply.feedback;
    feedback.truncate(MAX_FEEDBACK);
    let mut action_plan = reply.action_plan;
    action_plan.truncate(MAX_ACTION_PLAN);

    AuditResult {
        mode,
        final_score: reconciled.final_score,
        category_scores: reconciled.category_scores,
        parameter_scores: reconciled.parameter_scores,
        errors,
        feedback,
        action_plan,
        meta: AuditMeta {
            using_guide: resolved.using_guide,
            invalid_params_returned_by_ai: reconciled.invalid_params,
            params_count: resolved.parameters.counts(),
            received_audio_name: None,
            size_bytes: None,
        },
    }
}

fn empty_transcript_fallback() -> AudioAuditResult {
    AudioAuditResult {
        transcript: String::new(),
        audit: AuditResult {
            mode: Mode::Call,
            final_score: 0,
            category_scores: CategoryScores {
                language: 0,
                soft_skills: 0,
                process: 0,
            },
            parameter_scores: Vec::new(),
            errors: vec![
                "Speech not detected clearly. Please upload again in a quiet environment."
                    .to_string(),
            ],
            feedback: vec![
                "Audio quality may be too low. Try recording again closer to the mic.".to_string(),
            ],
            action_plan: vec![
                ActionItem {
                    day: 1,
                    task: "Record again with clear voice and low background noise.".to_string(),
                },
                ActionItem {
                    day: 2,
                    task: "Speak slowly and clearly (avoid speaking too fast).".to_string(),
                },
            ],
            meta: AuditMeta {
                using_guide: false,
                invalid_params_returned_by_ai: Vec::new(),
                params_count: ParamsCount {
                    language: 0,
                    soft_skills: 0,
                    process: 0,
                },
                received_audio_name: None,
                size_bytes: None,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assemble_truncates_advisory_lists() {
        let resolved = resolve_parameters(None, Mode::Chat);
        let reply: RawAuditReply = serde_json::from_value(json!({
            "parameterScores": [],
            "errors": (0..30).map(|i| format!("error {i}")).collect::<Vec<_>>(),
            "feedback": (0..30).map(|i| format!("tip {i}")).collect::<Vec<_>>(),
            "actionPlan": (0..30)
                .map(|i| json!({ "day": i, "task": format!("task {i}") }))
                .collect::<Vec<_>>(),
        }))
        .expect("lenient parse");

        let result = assemble(Mode::Chat, &resolved, reply);
        assert_eq!(result.errors.len(), MAX_ERRORS);
        assert_eq!(result.feedback.len(), MAX_FEEDBACK);
        assert_eq!(result.action_plan.len(), MAX_ACTION_PLAN);
        assert_eq!(
            result.parameter_scores.len(),
            ParameterSet::defaults(Mode::Chat).total()
        );
    }

    #[test]
    fn result_serializes_with_wire_field_names() {
        let resolved = resolve_parameters(None, Mode::Email);
        let result = assemble(Mode::Email, &resolved, RawAuditReply::default());
        let value = serde_json::to_value(&result).expect("serializes");

        assert_eq!(value["mode"], "email");
        assert!(value["finalScore"].is_u64());
        assert!(value["categoryScores"]["Soft Skills"].is_u64());
        assert!(value["meta"]["invalidParamsReturnedByAI"].is_array());
        assert!(value["meta"]["paramsCount"]["Language"].is_u64());
        assert!(value.get("transcript").is_none());
    }
}
