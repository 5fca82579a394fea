//! Seam between request handling and the external generation service.
//!
//! Handlers depend on the [`GenerativeProvider`] trait instead of a concrete
//! client, which keeps validation and reconciliation testable without network
//! access.

use async_trait::async_trait;

mod openai;

pub use openai::OpenAiProvider;

/// Instruction payload for a chat completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub user: String,
    pub temperature: f32,
    pub json_reply: bool,
}

impl CompletionRequest {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            temperature: 0.2,
            json_reply: false,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Request a constrained JSON-object reply where the service supports it.
    pub fn expecting_json(mut self) -> Self {
        self.json_reply = true;
        self
    }
}

/// An uploaded audio clip forwarded for transcription.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Error enumeration for upstream generation failures.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request to generation service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generation service returned status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("generation service returned an empty reply")]
    EmptyReply,
}

/// Contract implemented by the external text/audio generation capability.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Submit a prompt and return the raw textual reply.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;

    /// Transcribe an uploaded audio clip into plain text.
    async fn transcribe(&self, upload: AudioUpload) -> Result<String, ProviderError>;

    /// Synthesize speech for the given text, returning encoded audio bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError>;
}
