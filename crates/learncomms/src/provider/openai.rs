use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::ProviderConfig;

use super::{AudioUpload, CompletionRequest, GenerativeProvider, ProviderError};

/// HTTP client for the OpenAI-compatible completion/transcription/speech API.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response.text().await.unwrap_or_default();
        Err(ProviderError::Status {
            status: status.as_u16(),
            detail: detail.chars().take(500).collect(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionReply {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionReply {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl GenerativeProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user,
        });

        let mut body = json!({
            "model": self.config.chat_model,
            "temperature": request.temperature,
            "messages": messages,
        });
        if request.json_reply {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let response = self
            .http
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let reply: ChatCompletionReply = Self::check_status(response).await?.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ProviderError::EmptyReply);
        }
        Ok(content)
    }

    async fn transcribe(&self, upload: AudioUpload) -> Result<String, ProviderError> {
        let part = reqwest::multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = reqwest::multipart::Form::new()
            .text("model", self.config.transcription_model.clone())
            .part("file", part);

        let response = self
            .http
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let reply: TranscriptionReply = Self::check_status(response).await?.json().await?;
        Ok(reply.text)
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        let body = json!({
            "model": self.config.speech_model,
            "voice": self.config.voice,
            "input": text,
        });

        let response = self
            .http
            .post(self.endpoint("audio/speech"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let bytes = Self::check_status(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
