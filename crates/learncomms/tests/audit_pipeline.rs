use async_trait::async_trait;
use learncomms::audit::{
    AuditError, AuditRequest, GuideState, Mode, QaAuditService, RubricState, NEUTRAL_SCORE,
};
use learncomms::provider::{AudioUpload, CompletionRequest, GenerativeProvider, ProviderError};
use learncomms::speech::{SpeechScoreRequest, SpeechScoreService};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Provider double that replays canned payloads and records every prompt.
struct ScriptedProvider {
    completion: String,
    transcript: String,
    prompts: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    fn new(completion: String) -> Arc<Self> {
        Arc::new(Self {
            completion,
            transcript: "agent: thank you for calling, how can I help you today".to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn with_transcript(completion: String, transcript: &str) -> Arc<Self> {
        Arc::new(Self {
            completion,
            transcript: transcript.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn recorded_prompts(&self) -> Vec<CompletionRequest> {
        self.prompts.lock().expect("prompt mutex").clone()
    }
}

#[async_trait]
impl GenerativeProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.prompts.lock().expect("prompt mutex").push(request);
        Ok(self.completion.clone())
    }

    async fn transcribe(&self, _upload: AudioUpload) -> Result<String, ProviderError> {
        Ok(self.transcript.clone())
    }

    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, ProviderError> {
        Ok(vec![0u8; 4])
    }
}

fn guide_with_seven_call_parameters() -> GuideState {
    serde_json::from_value(json!({
        "call": {
            "Language": ["Grammar", "Fluency", "Pronunciation"],
            "Soft Skills": ["Empathy / Reassurance", "Active Listening"],
            "Process": ["Resolution accuracy", "Process adherence / compliance"]
        }
    }))
    .expect("guide deserializes")
}

fn reply_scoring_guide_parameters() -> String {
    json!({
        "mode": "call",
        "parameterScores": [
            { "category": "Language", "parameter": "Grammar", "score": 4, "reason": "mostly correct" },
            { "category": "Language", "parameter": "fluency", "score": 4, "reason": "steady pace" },
            { "category": "Language", "parameter": "Pronunciation", "score": 3, "reason": "clear enough" },
            { "category": "Soft Skills", "parameter": "Emapthy / Reassurance", "score": 5, "reason": "misspelled name" },
            { "category": "Soft Skills", "parameter": "Active Listening", "score": 4, "reason": "paraphrased well" },
            { "category": "Process", "parameter": "Resolution accuracy", "score": 4, "reason": "correct fix" },
            { "category": "Process", "parameter": "Process adherence / compliance", "score": 2, "reason": "skipped verification" }
        ],
        "errors": ["did not verify the account"],
        "feedback": ["verify identity before troubleshooting"],
        "actionPlan": [{ "day": 1, "task": "review the verification checklist" }]
    })
    .to_string()
}

#[tokio::test]
async fn custom_guide_drives_the_whole_pipeline() {
    let provider = ScriptedProvider::new(reply_scoring_guide_parameters());
    let service = QaAuditService::new(provider.clone());

    let request = AuditRequest {
        evaluator_name: "Priya".to_string(),
        agent_name: "Arun".to_string(),
        params_state: Some(guide_with_seven_call_parameters()),
        rubrics_state: None,
    };
    let text = "customer: my internet keeps dropping every evening around seven pm";

    let result = service
        .audit_text(Mode::Call, text, &request)
        .await
        .expect("audit succeeds");

    assert!(result.meta.using_guide);
    assert_eq!(result.parameter_scores.len(), 7);

    // The misspelled parameter is reported and its slot backfilled neutrally.
    assert_eq!(
        result.meta.invalid_params_returned_by_ai,
        vec!["Emapthy / Reassurance".to_string()]
    );
    let empathy = result
        .parameter_scores
        .iter()
        .find(|entry| entry.parameter == "Empathy / Reassurance")
        .expect("canonical slot present");
    assert_eq!(empathy.score, NEUTRAL_SCORE);

    // 4+4+3+3+4+4+2 = 24 of 35 -> 69%.
    assert_eq!(result.final_score, 69);

    // The prompt enumerated the guide's exact strings.
    let prompts = provider.recorded_prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].user.contains("Process adherence / compliance"));
    assert!(prompts[0].json_reply);
}

#[tokio::test]
async fn sparse_guide_falls_back_to_defaults() {
    let provider = ScriptedProvider::new(
        json!({ "parameterScores": [], "errors": [], "feedback": [], "actionPlan": [] })
            .to_string(),
    );
    let service = QaAuditService::new(provider.clone());

    let sparse: GuideState = serde_json::from_value(json!({
        "chat": { "Language": ["Grammar", ""], "Soft Skills": "not-a-list" }
    }))
    .expect("guide deserializes");

    let request = AuditRequest {
        evaluator_name: String::new(),
        agent_name: String::new(),
        params_state: Some(sparse),
        rubrics_state: None,
    };

    let result = service
        .audit_text(
            Mode::Chat,
            "customer: the invoice amount looks wrong to me, can you check it",
            &request,
        )
        .await
        .expect("audit succeeds");

    assert!(!result.meta.using_guide);
    // Empty reply: every default parameter is backfilled with the neutral score.
    assert!(result
        .parameter_scores
        .iter()
        .all(|entry| entry.score == NEUTRAL_SCORE));
    assert_eq!(result.final_score, 60);
}

#[tokio::test]
async fn rubrics_only_bind_when_the_guide_is_in_use() {
    let empty_reply =
        json!({ "parameterScores": [], "errors": [], "feedback": [], "actionPlan": [] })
            .to_string();

    let rubrics: RubricState = serde_json::from_value(json!({
        "call": { "Grammar": { "5": "flawless grammar throughout" } }
    }))
    .expect("rubrics deserialize");

    // Without a guide the rubric text must not reach the prompt.
    let provider = ScriptedProvider::new(empty_reply.clone());
    let service = QaAuditService::new(provider.clone());
    let request = AuditRequest {
        evaluator_name: String::new(),
        agent_name: String::new(),
        params_state: None,
        rubrics_state: Some(rubrics.clone()),
    };
    service
        .audit_text(
            Mode::Call,
            "customer: I would like to close my account please, today if possible",
            &request,
        )
        .await
        .expect("audit succeeds");
    assert!(!provider.recorded_prompts()[0]
        .user
        .contains("flawless grammar throughout"));

    // With a guide naming Grammar, it must.
    let provider = ScriptedProvider::new(empty_reply);
    let service = QaAuditService::new(provider.clone());
    let request = AuditRequest {
        evaluator_name: String::new(),
        agent_name: String::new(),
        params_state: Some(guide_with_seven_call_parameters()),
        rubrics_state: Some(rubrics),
    };
    service
        .audit_text(
            Mode::Call,
            "customer: I would like to close my account please, today if possible",
            &request,
        )
        .await
        .expect("audit succeeds");
    assert!(provider.recorded_prompts()[0]
        .user
        .contains("flawless grammar throughout"));
}

#[tokio::test]
async fn short_text_is_rejected_before_any_provider_call() {
    let provider = ScriptedProvider::new("unused".to_string());
    let service = QaAuditService::new(provider.clone());
    let request = AuditRequest::default();

    let err = service
        .audit_text(Mode::Email, "   hi   ", &request)
        .await
        .expect_err("short text rejected");

    assert!(matches!(err, AuditError::TextTooShort));
    assert!(provider.recorded_prompts().is_empty());
}

#[tokio::test]
async fn audio_audit_only_supports_call_mode() {
    let provider = ScriptedProvider::new("unused".to_string());
    let service = QaAuditService::new(provider);

    let upload = AudioUpload {
        file_name: "clip.mp3".to_string(),
        bytes: vec![1, 2, 3],
    };
    let err = service
        .audit_audio(Mode::Chat, upload, &AuditRequest::default())
        .await
        .expect_err("chat audio rejected");

    assert!(matches!(err, AuditError::UnsupportedAudioMode));
}

#[tokio::test]
async fn audio_audit_attaches_file_metadata() {
    let provider = ScriptedProvider::new(reply_scoring_guide_parameters());
    let service = QaAuditService::new(provider);

    let request = AuditRequest {
        evaluator_name: String::new(),
        agent_name: String::new(),
        params_state: Some(guide_with_seven_call_parameters()),
        rubrics_state: None,
    };
    let upload = AudioUpload {
        file_name: "call-recording.mp3".to_string(),
        bytes: vec![0u8; 2048],
    };

    let result = service
        .audit_audio(Mode::Call, upload, &request)
        .await
        .expect("audio audit succeeds");

    assert!(!result.transcript.is_empty());
    assert_eq!(
        result.audit.meta.received_audio_name.as_deref(),
        Some("call-recording.mp3")
    );
    assert_eq!(result.audit.meta.size_bytes, Some(2048));
    assert_eq!(result.audit.final_score, 69);
}

#[tokio::test]
async fn silent_recording_returns_guidance_instead_of_failing() {
    let provider = ScriptedProvider::with_transcript("unused".to_string(), "   ");
    let service = QaAuditService::new(provider.clone());

    let upload = AudioUpload {
        file_name: "silence.mp3".to_string(),
        bytes: vec![0u8; 16],
    };
    let result = service
        .audit_audio(Mode::Call, upload, &AuditRequest::default())
        .await
        .expect("fallback is a success");

    assert!(result.transcript.is_empty());
    assert_eq!(result.audit.final_score, 0);
    assert!(result.audit.errors[0].contains("Speech not detected"));
    assert!(provider.recorded_prompts().is_empty());
}

#[tokio::test]
async fn unparseable_audit_reply_is_a_formatting_error() {
    let provider = ScriptedProvider::new("Sorry, I can only answer in prose.".to_string());
    let service = QaAuditService::new(provider);

    let err = service
        .audit_text(
            Mode::Call,
            "customer: the technician never showed up for the appointment window",
            &AuditRequest::default(),
        )
        .await
        .expect_err("formatting failure surfaces");

    match err {
        AuditError::Formatting { raw } => assert!(raw.contains("prose")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn speech_score_parses_report_and_keeps_transcript() {
    let provider = ScriptedProvider::new(
        json!({
            "scores": { "fluency": 74, "grammar": 68 },
            "strengths": ["steady pacing"],
            "improvements": ["reduce filler words"],
            "trainingPlan": ["record a one-minute answer daily"]
        })
        .to_string(),
    );
    let service = SpeechScoreService::new(provider);

    let upload = AudioUpload {
        file_name: "practice.mp3".to_string(),
        bytes: vec![0u8; 64],
    };
    let result = service
        .score(
            upload,
            &SpeechScoreRequest {
                practice_prompt: "describe your last project".to_string(),
                level: "intermediate".to_string(),
            },
        )
        .await
        .expect("scoring succeeds");

    assert!(!result.transcript.is_empty());
    assert_eq!(result.report.scores.get("fluency"), Some(&74));
    assert_eq!(result.report.strengths, vec!["steady pacing".to_string()]);
}

#[tokio::test]
async fn silent_speech_recording_gets_the_retry_guidance() {
    let provider = ScriptedProvider::with_transcript("unused".to_string(), "");
    let service = SpeechScoreService::new(provider);

    let upload = AudioUpload {
        file_name: "practice.mp3".to_string(),
        bytes: vec![0u8; 8],
    };
    let result = service
        .score(upload, &SpeechScoreRequest::default())
        .await
        .expect("fallback succeeds");

    assert!(result.transcript.is_empty());
    assert!(result.report.scores.is_empty());
    assert!(result.report.improvements[0].contains("record again")
        || result.report.improvements[0].contains("Please record again"));
}
