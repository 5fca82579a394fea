//! Speaking practice scoring: transcribe an uploaded recording and grade the
//! speaking performance against a practice prompt and learner level.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::provider::{AudioUpload, CompletionRequest, GenerativeProvider, ProviderError};

/// Inputs alongside the uploaded recording.
#[derive(Debug, Clone, Default)]
pub struct SpeechScoreRequest {
    pub practice_prompt: String,
    pub level: String,
}

/// Per-dimension scores (0-100) plus coaching lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechReport {
    #[serde(default)]
    pub scores: BTreeMap<String, u8>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub training_plan: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeechScoreResult {
    pub transcript: String,
    #[serde(flatten)]
    pub report: SpeechReport,
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechScoreError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("AI returned invalid JSON")]
    Formatting { raw: String },
}

pub struct SpeechScoreService {
    provider: Arc<dyn GenerativeProvider>,
}

impl SpeechScoreService {
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        Self { provider }
    }

    pub async fn score(
        &self,
        upload: AudioUpload,
        request: &SpeechScoreRequest,
    ) -> Result<SpeechScoreResult, SpeechScoreError> {
        let transcript = self.provider.transcribe(upload).await?.trim().to_string();
        if transcript.is_empty() {
            return Ok(empty_transcript_fallback());
        }

        let raw = self
            .provider
            .complete(
                CompletionRequest::new(scoring_prompt(&transcript, request))
                    .with_temperature(0.2)
                    .expecting_json(),
            )
            .await?;

        let report: SpeechReport = match serde_json::from_str(raw.trim()) {
            Ok(report) => report,
            Err(err) => {
                warn!(%err, raw, "speech score reply was not parseable JSON");
                return Err(SpeechScoreError::Formatting { raw });
            }
        };

        Ok(SpeechScoreResult { transcript, report })
    }
}

fn scoring_prompt(transcript: &str, request: &SpeechScoreRequest) -> String {
    format!(
        "You are an English speaking coach scoring a practice recording.\n\
         \n\
         Learner level: {level}\n\
         Practice prompt: {practice}\n\
         \n\
         Transcript of the learner's speech:\n\
         {transcript}\n\
         \n\
         Score each dimension 0-100 based only on the transcript:\n\
         fluency, pronunciation, grammar, vocabulary, coherence\n\
         \n\
         Return ONLY JSON in this schema:\n\
         {{\n\
         \x20 \"scores\": {{ \"fluency\": 0, \"pronunciation\": 0, \"grammar\": 0, \
         \"vocabulary\": 0, \"coherence\": 0 }},\n\
         \x20 \"strengths\": [\"...\"],\n\
         \x20 \"improvements\": [\"...\"],\n\
         \x20 \"trainingPlan\": [\"...\"]\n\
         }}",
        level = if request.level.trim().is_empty() {
            "unspecified"
        } else {
            request.level.trim()
        },
        practice = request.practice_prompt.trim(),
    )
}

fn empty_transcript_fallback() -> SpeechScoreResult {
    SpeechScoreResult {
        transcript: String::new(),
        report: SpeechReport {
            scores: BTreeMap::new(),
            strengths: Vec::new(),
            improvements: vec![
                "Speech not detected clearly. Please record again in a quiet environment."
                    .to_string(),
            ],
            training_plan: vec![
                "Record again with clear voice and low background noise.".to_string(),
                "Speak slowly and clearly (avoid speaking too fast).".to_string(),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_parses_with_defaults_for_missing_lists() {
        let report: SpeechReport =
            serde_json::from_value(json!({ "scores": { "fluency": 72 } })).expect("deserializes");
        assert_eq!(report.scores.get("fluency"), Some(&72));
        assert!(report.strengths.is_empty());
    }

    #[test]
    fn result_flattens_report_fields() {
        let result = SpeechScoreResult {
            transcript: "hello".to_string(),
            report: SpeechReport {
                scores: BTreeMap::from([("grammar".to_string(), 80)]),
                strengths: vec!["clear pacing".to_string()],
                improvements: Vec::new(),
                training_plan: Vec::new(),
            },
        };
        let value = serde_json::to_value(&result).expect("serializes");
        assert_eq!(value["transcript"], "hello");
        assert_eq!(value["scores"]["grammar"], 80);
        assert!(value["strengths"].is_array());
        assert!(value["trainingPlan"].is_array());
    }

    #[test]
    fn prompt_defaults_level_when_blank() {
        let prompt = scoring_prompt(
            "hi there",
            &SpeechScoreRequest {
                practice_prompt: "introduce yourself".to_string(),
                level: "  ".to_string(),
            },
        );
        assert!(prompt.contains("Learner level: unspecified"));
        assert!(prompt.contains("introduce yourself"));
    }
}
