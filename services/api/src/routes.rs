use crate::infra::{collect_multipart, AppState};
use axum::extract::{DefaultBodyLimit, Multipart, Path};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use learncomms::audio::AudioKind;
use learncomms::audit::{AuditRequest, GuideState, Mode, RubricState};
use learncomms::coaching::{
    decode_prompt, parse_decode_reply, pronounce_prompt, reply_prompt, split_replies,
    split_versions, writing_prompt, ComposeRequest, PronounceMode,
};
use learncomms::error::AppError;
use learncomms::provider::CompletionRequest;
use learncomms::resume;
use learncomms::scripts::{build_script_prompt, parse_script_variants, ScriptKind, ScriptRequest};
use learncomms::speech::SpeechScoreRequest;
use learncomms::trainer;
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::Ordering;

/// Upload routes accept recordings and resumes up to this size.
const UPLOAD_LIMIT_BYTES: usize = 15 * 1024 * 1024;

pub(crate) fn app_router() -> Router {
    Router::new()
        .route("/", get(root_endpoint))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/qa-audit-text", post(qa_audit_text_endpoint))
        .route(
            "/api/qa-audit-audio",
            post(qa_audit_audio_endpoint).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route("/api/scripts/:kind", post(script_endpoint))
        .route(
            "/api/sentence-intonation",
            post(sentence_intonation_endpoint),
        )
        .route(
            "/api/pronunciation-audio",
            post(pronunciation_audio_endpoint),
        )
        .route("/api/audio-intonation/:file", get(intonation_file_endpoint))
        .route(
            "/api/audio-pronunciation/:file",
            get(pronunciation_file_endpoint),
        )
        .route("/api/pronounce", post(pronounce_endpoint))
        .route("/api/message-decode", post(message_decode_endpoint))
        .route("/api/message-reply", post(message_reply_endpoint))
        .route("/api/writing-assistant", post(writing_assistant_endpoint))
        .route(
            "/api/import-resume",
            post(import_resume_endpoint).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        // Older clients still post resumes to the unprefixed path.
        .route(
            "/upload-resume",
            post(import_resume_endpoint).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route("/api/ask-learncomms", post(ask_learncomms_endpoint))
        .route(
            "/api/speech-score",
            post(speech_score_endpoint).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
}

pub(crate) async fn root_endpoint() -> &'static str {
    "LearnComms Backend is running"
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "auditsServed": state.audits_served.load(Ordering::Relaxed),
    }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QaAuditTextRequest {
    #[serde(default = "default_mode")]
    pub(crate) mode: String,
    #[serde(default)]
    pub(crate) text: String,
    #[serde(default)]
    pub(crate) evaluator_name: String,
    #[serde(default)]
    pub(crate) agent_name: String,
    #[serde(default)]
    pub(crate) params_state: Option<GuideState>,
    #[serde(default)]
    pub(crate) rubrics_state: Option<RubricState>,
}

fn default_mode() -> String {
    "call".to_string()
}

fn parse_mode(raw: &str) -> Result<Mode, AppError> {
    raw.trim()
        .to_lowercase()
        .parse::<Mode>()
        .map_err(|err| AppError::validation(err.to_string()))
}

pub(crate) async fn qa_audit_text_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<QaAuditTextRequest>,
) -> Result<Response, AppError> {
    let mode = parse_mode(&payload.mode)?;
    let request = AuditRequest {
        evaluator_name: payload.evaluator_name.trim().to_string(),
        agent_name: payload.agent_name.trim().to_string(),
        params_state: payload.params_state,
        rubrics_state: payload.rubrics_state,
    };

    let result = state.audits.audit_text(mode, &payload.text, &request).await?;
    state.audits_served.fetch_add(1, Ordering::Relaxed);
    Ok(Json(result).into_response())
}

pub(crate) async fn qa_audit_audio_endpoint(
    Extension(state): Extension<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = collect_multipart(multipart, "audio").await?;

    let mode = parse_mode(&form.text_or("mode", "call"))?;
    let request = AuditRequest {
        evaluator_name: form.text_or("evaluatorName", ""),
        agent_name: form.text_or("agentName", ""),
        params_state: form
            .text("paramsState")
            .and_then(|raw| serde_json::from_str::<GuideState>(raw).ok()),
        rubrics_state: form
            .text("rubricsState")
            .and_then(|raw| serde_json::from_str::<RubricState>(raw).ok()),
    };

    let upload = form.take_file().ok_or_else(|| {
        AppError::validation("Audio file is required (field name must be 'audio').")
    })?;

    let result = state.audits.audit_audio(mode, upload, &request).await?;
    state.audits_served.fetch_add(1, Ordering::Relaxed);
    Ok(Json(result).into_response())
}

pub(crate) async fn script_endpoint(
    Extension(state): Extension<AppState>,
    Path(kind): Path<String>,
    Json(payload): Json<ScriptRequest>,
) -> Result<Response, AppError> {
    let kind = ScriptKind::from_segment(&kind)
        .ok_or_else(|| AppError::validation(format!("unknown script kind '{kind}'")))?;
    let prompt = build_script_prompt(kind, &payload)
        .map_err(|err| AppError::validation(err.to_string()))?;

    let raw = state
        .provider
        .complete(CompletionRequest::new(prompt).with_temperature(kind.temperature()))
        .await?;

    Ok(Json(parse_script_variants(&raw)).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct IntonationRequest {
    #[serde(default)]
    pub(crate) sentence: String,
}

pub(crate) async fn sentence_intonation_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<IntonationRequest>,
) -> Result<Response, AppError> {
    let sentence = payload.sentence.trim();
    if sentence.is_empty() {
        return Err(AppError::validation("Sentence required"));
    }

    let bytes = state.provider.synthesize(sentence).await?;
    let file_name = state.audio.store_intonation(&bytes).await?;

    Ok(Json(json!({ "audio_url": format!("/api/audio-intonation/{file_name}") })).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct PronunciationAudioRequest {
    #[serde(default)]
    pub(crate) word: String,
}

pub(crate) async fn pronunciation_audio_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<PronunciationAudioRequest>,
) -> Result<Response, AppError> {
    let word = payload.word.trim();
    if word.is_empty() {
        return Err(AppError::validation("Word required"));
    }

    let file_name = match state.audio.cached_pronunciation(word) {
        Some(file_name) => file_name,
        None => {
            let bytes = state.provider.synthesize(word).await?;
            state.audio.store_pronunciation(word, &bytes).await?
        }
    };

    Ok(
        Json(json!({ "audio_url": format!("/api/audio-pronunciation/{file_name}") }))
            .into_response(),
    )
}

pub(crate) async fn intonation_file_endpoint(
    Extension(state): Extension<AppState>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    serve_audio(&state, AudioKind::Intonation, &file).await
}

pub(crate) async fn pronunciation_file_endpoint(
    Extension(state): Extension<AppState>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    serve_audio(&state, AudioKind::Pronunciation, &file).await
}

async fn serve_audio(state: &AppState, kind: AudioKind, file: &str) -> Result<Response, AppError> {
    let path = state.audio.resolve(kind, file)?;
    let bytes = tokio::fs::read(&path).await?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct PronounceRequest {
    #[serde(default)]
    pub(crate) text: String,
    #[serde(default)]
    pub(crate) mode: PronounceMode,
}

pub(crate) async fn pronounce_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<PronounceRequest>,
) -> Result<Response, AppError> {
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(AppError::validation("Text required"));
    }

    let (prompt, temperature) = pronounce_prompt(payload.mode, text);
    let raw = state
        .provider
        .complete(CompletionRequest::new(prompt).with_temperature(temperature))
        .await?;

    Ok(Json(json!({ "result": raw.trim() })).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecodeRequest {
    #[serde(default)]
    pub(crate) text: String,
}

pub(crate) async fn message_decode_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DecodeRequest>,
) -> Result<Response, AppError> {
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(AppError::validation("Text is required"));
    }

    let raw = state
        .provider
        .complete(CompletionRequest::new(decode_prompt(text)).with_temperature(0.2))
        .await?;

    Ok(Json(parse_decode_reply(&raw)).into_response())
}

pub(crate) async fn message_reply_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ComposeRequest>,
) -> Result<Response, AppError> {
    if payload.text.trim().is_empty() {
        return Err(AppError::validation("Text is required"));
    }

    let raw = state
        .provider
        .complete(CompletionRequest::new(reply_prompt(&payload)).with_temperature(0.4))
        .await?;

    Ok(Json(json!({ "replies": split_replies(&raw) })).into_response())
}

pub(crate) async fn writing_assistant_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ComposeRequest>,
) -> Result<Response, AppError> {
    if payload.text.trim().is_empty() {
        return Err(AppError::validation("Text is required"));
    }

    let raw = state
        .provider
        .complete(CompletionRequest::new(writing_prompt(&payload)).with_temperature(0.4))
        .await?;

    Ok(Json(json!({ "versions": split_versions(&raw) })).into_response())
}

pub(crate) async fn import_resume_endpoint(
    Extension(state): Extension<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = collect_multipart(multipart, "resume").await?;
    let upload = form
        .take_file()
        .ok_or_else(|| AppError::validation("No file uploaded"))?;

    let text = String::from_utf8_lossy(&upload.bytes).into_owned();
    let raw = state
        .provider
        .complete(CompletionRequest::new(resume::extraction_prompt(&text)).with_temperature(0.0))
        .await?;

    Ok(Json(resume::parse_profile(&raw, &text)).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrainerQuestion {
    #[serde(default)]
    pub(crate) question: String,
}

pub(crate) async fn ask_learncomms_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<TrainerQuestion>,
) -> Result<Response, AppError> {
    let question = payload.question.trim();
    if question.is_empty() {
        return Err(AppError::validation("Question is required"));
    }

    if trainer::is_blocked_topic(question) {
        return Ok(Json(json!({
            "refused": true,
            "message": trainer::REFUSAL_MESSAGE,
        }))
        .into_response());
    }

    let raw = state
        .provider
        .complete(
            CompletionRequest::new(question)
                .with_system(trainer::trainer_system_prompt())
                .with_temperature(0.4),
        )
        .await?;

    Ok(Json(trainer::parse_trainer_reply(&raw)).into_response())
}

pub(crate) async fn speech_score_endpoint(
    Extension(state): Extension<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = collect_multipart(multipart, "audio").await?;
    let request = SpeechScoreRequest {
        practice_prompt: form.text_or("prompt", ""),
        level: form.text_or("level", ""),
    };

    let upload = form.take_file().ok_or_else(|| {
        AppError::validation("Audio file is required (field name must be 'audio').")
    })?;

    let result = state.speech.score(upload, &request).await?;
    Ok(Json(result).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use learncomms::audio::AudioCache;
    use learncomms::audit::QaAuditService;
    use learncomms::config::AudioConfig;
    use learncomms::provider::{AudioUpload, GenerativeProvider, ProviderError};
    use learncomms::speech::SpeechScoreService;
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize};
    use std::sync::Arc;

    struct FakeProvider {
        completion: String,
        transcript: String,
        speech: Vec<u8>,
        completions_served: AtomicUsize,
    }

    impl FakeProvider {
        fn completing(completion: &str) -> Self {
            Self {
                completion: completion.to_string(),
                transcript: "thank you for calling, how can I help".to_string(),
                speech: b"mp3".to_vec(),
                completions_served: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerativeProvider for FakeProvider {
        async fn complete(&self, _request: CompletionRequest) -> Result<String, ProviderError> {
            self.completions_served.fetch_add(1, Ordering::SeqCst);
            if self.completion.is_empty() {
                return Err(ProviderError::EmptyReply);
            }
            Ok(self.completion.clone())
        }

        async fn transcribe(&self, _upload: AudioUpload) -> Result<String, ProviderError> {
            Ok(self.transcript.clone())
        }

        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, ProviderError> {
            Ok(self.speech.clone())
        }
    }

    fn test_state(provider: Arc<FakeProvider>) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().expect("tempdir");
        let audio = AudioCache::open(&AudioConfig {
            pronunciation_dir: dir.path().join("pron"),
            intonation_dir: dir.path().join("into"),
        })
        .expect("open cache");

        let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
            .build_recorder()
            .handle();
        let provider: Arc<dyn GenerativeProvider> = provider;

        let state = AppState {
            provider: provider.clone(),
            audits: Arc::new(QaAuditService::new(provider.clone())),
            speech: Arc::new(SpeechScoreService::new(provider)),
            audio,
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(handle),
            audits_served: Arc::new(AtomicU64::new(0)),
        };
        (dir, state)
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn audit_reply() -> String {
        json!({
            "mode": "chat",
            "parameterScores": [
                { "category": "Language", "parameter": "Grammar", "score": 4, "reason": "solid" },
                { "category": "Soft Skills", "parameter": "Empathy & acknowledgement", "score": 2, "reason": "flat" }
            ],
            "errors": ["missed greeting"],
            "feedback": ["acknowledge feelings first"],
            "actionPlan": [{ "day": 1, "task": "practice acknowledgement lines" }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn qa_audit_text_scores_and_counts_the_visit() {
        let provider = Arc::new(FakeProvider::completing(&audit_reply()));
        let (_guard, state) = test_state(provider);

        let request = QaAuditTextRequest {
            mode: "chat".to_string(),
            text: "customer: my order is late and nobody replied to me yet".to_string(),
            evaluator_name: "Priya".to_string(),
            agent_name: "Arun".to_string(),
            params_state: None,
            rubrics_state: None,
        };

        let response = qa_audit_text_endpoint(Extension(state.clone()), Json(request))
            .await
            .expect("audit succeeds");
        let body = json_body(response).await;

        assert_eq!(body["mode"], "chat");
        assert!(body["finalScore"].is_u64());
        // Unscored default parameters are filled with the neutral score.
        assert_eq!(
            body["parameterScores"].as_array().map(Vec::len),
            Some(10)
        );
        assert_eq!(body["errors"][0], "missed greeting");
        assert_eq!(state.audits_served.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn qa_audit_text_rejects_short_text() {
        let provider = Arc::new(FakeProvider::completing(&audit_reply()));
        let (_guard, state) = test_state(provider.clone());

        let request = QaAuditTextRequest {
            mode: "call".to_string(),
            text: "too short".to_string(),
            evaluator_name: String::new(),
            agent_name: String::new(),
            params_state: None,
            rubrics_state: None,
        };

        let err = qa_audit_text_endpoint(Extension(state), Json(request))
            .await
            .expect_err("short text rejected");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider.completions_served.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn qa_audit_text_rejects_unknown_mode() {
        let provider = Arc::new(FakeProvider::completing(&audit_reply()));
        let (_guard, state) = test_state(provider);

        let request = QaAuditTextRequest {
            mode: "carrier-pigeon".to_string(),
            text: "a perfectly long enough transcript for the validator".to_string(),
            evaluator_name: String::new(),
            agent_name: String::new(),
            params_state: None,
            rubrics_state: None,
        };

        let err = qa_audit_text_endpoint(Extension(state), Json(request))
            .await
            .expect_err("mode rejected");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn script_endpoint_returns_three_variants() {
        let provider = Arc::new(FakeProvider::completing(
            "Primary:\nThanks for calling!\n\nAlternative 1:\nHello there!\n\nAlternative 2:\nGood morning!\n",
        ));
        let (_guard, state) = test_state(provider);

        let request = ScriptRequest {
            category: "callOpening".to_string(),
            ..ScriptRequest::default()
        };
        let response = script_endpoint(
            Extension(state),
            Path("call-opening".to_string()),
            Json(request),
        )
        .await
        .expect("script generated");
        let body = json_body(response).await;

        assert_eq!(body["primary"], "Thanks for calling!");
        assert_eq!(body["alternative1"], "Hello there!");
        assert_eq!(body["alternative2"], "Good morning!");
    }

    #[tokio::test]
    async fn script_endpoint_rejects_unknown_kind() {
        let provider = Arc::new(FakeProvider::completing("anything"));
        let (_guard, state) = test_state(provider);

        let err = script_endpoint(
            Extension(state),
            Path("call-yodeling".to_string()),
            Json(ScriptRequest::default()),
        )
        .await
        .expect_err("unknown kind rejected");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn pronunciation_audio_is_cached_between_calls() {
        let provider = Arc::new(FakeProvider::completing("unused"));
        let (_guard, state) = test_state(provider);

        let first = pronunciation_audio_endpoint(
            Extension(state.clone()),
            Json(PronunciationAudioRequest {
                word: "schedule".to_string(),
            }),
        )
        .await
        .expect("first synthesis");
        let first = json_body(first).await;

        let second = pronunciation_audio_endpoint(
            Extension(state.clone()),
            Json(PronunciationAudioRequest {
                word: "SCHEDULE".to_string(),
            }),
        )
        .await
        .expect("cache hit");
        let second = json_body(second).await;

        assert_eq!(first["audio_url"], second["audio_url"]);

        let file = first["audio_url"]
            .as_str()
            .and_then(|url| url.rsplit('/').next())
            .expect("file name");
        let served = pronunciation_file_endpoint(Extension(state), Path(file.to_string()))
            .await
            .expect("file served");
        assert_eq!(served.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn audio_file_requests_cannot_escape_the_cache() {
        let provider = Arc::new(FakeProvider::completing("unused"));
        let (_guard, state) = test_state(provider);

        let err = pronunciation_file_endpoint(
            Extension(state.clone()),
            Path("../../etc/passwd.mp3".to_string()),
        )
        .await
        .expect_err("traversal rejected");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = intonation_file_endpoint(
            Extension(state),
            Path(format!("{}.mp3", "0".repeat(32))),
        )
        .await
        .expect_err("missing file");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blocked_trainer_question_never_reaches_the_provider() {
        let provider = Arc::new(FakeProvider::completing("unused"));
        let (_guard, state) = test_state(provider.clone());

        let response = ask_learncomms_endpoint(
            Extension(state),
            Json(TrainerQuestion {
                question: "what is the latest bitcoin price".to_string(),
            }),
        )
        .await
        .expect("refusal is a success response");
        let body = json_body(response).await;

        assert_eq!(body["refused"], true);
        assert!(body["message"].as_str().is_some());
        assert_eq!(provider.completions_served.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn message_decode_parses_labeled_sections() {
        let provider = Arc::new(FakeProvider::completing(
            "Likely intent:\nThe sender likely wants an update.\n\nEmotional tone:\nImpatient\n\nWhat the sender is focusing on:\nThe deadline.\n\nWhat this message is NOT:\nAn attack.\n",
        ));
        let (_guard, state) = test_state(provider);

        let response = message_decode_endpoint(
            Extension(state),
            Json(DecodeRequest {
                text: "where is my order??".to_string(),
            }),
        )
        .await
        .expect("decode succeeds");
        let body = json_body(response).await;

        assert_eq!(body["likelyIntent"], "The sender likely wants an update.");
        assert_eq!(body["tone"], "Impatient");
    }

    #[tokio::test]
    async fn resume_routes_accept_uploads_on_both_paths() {
        use tower::ServiceExt;

        let provider = Arc::new(FakeProvider::completing(
            &json!({
                "name": "Priya Sharma",
                "title": "Support Specialist",
                "skills": ["empathy", "written English"]
            })
            .to_string(),
        ));
        let (_guard, state) = test_state(provider);
        let router = app_router().layer(Extension(state));

        let boundary = "resume-test-boundary";
        let form = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"resume\"; filename=\"cv.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             Priya Sharma, support specialist, five years on chat queues.\r\n\
             --{boundary}--\r\n"
        );

        for path in ["/api/import-resume", "/upload-resume"] {
            let response = router
                .clone()
                .oneshot(
                    axum::http::Request::post(path)
                        .header(
                            header::CONTENT_TYPE,
                            format!("multipart/form-data; boundary={boundary}"),
                        )
                        .body(axum::body::Body::from(form.clone()))
                        .unwrap(),
                )
                .await
                .expect("route executes");

            assert_eq!(response.status(), StatusCode::OK, "path {path}");
            let body = json_body(response).await;
            assert_eq!(body["name"], "Priya Sharma");
            assert_eq!(body["skills"][0], "empathy");
        }
    }

    #[tokio::test]
    async fn health_reports_audit_counter() {
        let provider = Arc::new(FakeProvider::completing("unused"));
        let (_guard, state) = test_state(provider);
        state.audits_served.fetch_add(3, Ordering::Relaxed);

        let Json(body) = healthcheck(Extension(state)).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["auditsServed"], 3);
    }
}
