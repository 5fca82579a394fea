//! On-disk audio cache for generated speech clips.
//!
//! Pronunciation clips are content-addressed by the lowercased word, so the
//! same word never pays for synthesis twice. Intonation clips are one-shot
//! and get a random name. Concurrent writers for the same word are harmless:
//! both produce identical content.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::AudioConfig;

#[derive(Debug, thiserror::Error)]
pub enum AudioCacheError {
    #[error("audio file name is not valid")]
    InvalidFileName,
    #[error("audio file not found")]
    NotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Which of the two cache directories a file lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioKind {
    Pronunciation,
    Intonation,
}

#[derive(Debug, Clone)]
pub struct AudioCache {
    pronunciation_dir: PathBuf,
    intonation_dir: PathBuf,
}

impl AudioCache {
    /// Open the cache, creating both directories if needed.
    pub fn open(config: &AudioConfig) -> Result<Self, AudioCacheError> {
        std::fs::create_dir_all(&config.pronunciation_dir)?;
        std::fs::create_dir_all(&config.intonation_dir)?;
        Ok(Self {
            pronunciation_dir: config.pronunciation_dir.clone(),
            intonation_dir: config.intonation_dir.clone(),
        })
    }

    /// Cache key for a word: hex sha256 of the lowercased word, mp3 suffix.
    pub fn pronunciation_file_name(word: &str) -> String {
        let digest = Sha256::digest(word.to_lowercase().as_bytes());
        format!("{digest:x}.mp3")
    }

    /// Return the cached file name for a word if a clip already exists.
    pub fn cached_pronunciation(&self, word: &str) -> Option<String> {
        let file_name = Self::pronunciation_file_name(word);
        self.pronunciation_dir
            .join(&file_name)
            .is_file()
            .then_some(file_name)
    }

    /// Persist a freshly synthesized pronunciation clip and return its name.
    pub async fn store_pronunciation(
        &self,
        word: &str,
        bytes: &[u8],
    ) -> Result<String, AudioCacheError> {
        let file_name = Self::pronunciation_file_name(word);
        tokio::fs::write(self.pronunciation_dir.join(&file_name), bytes).await?;
        Ok(file_name)
    }

    /// Persist an intonation clip under a fresh random name.
    pub async fn store_intonation(&self, bytes: &[u8]) -> Result<String, AudioCacheError> {
        let file_name = format!("{}.mp3", Uuid::new_v4());
        tokio::fs::write(self.intonation_dir.join(&file_name), bytes).await?;
        Ok(file_name)
    }

    /// Resolve a requested file name to an on-disk path. Rejects anything
    /// that is not a bare mp3 file name, so requests can never escape the
    /// cache directories.
    pub fn resolve(&self, kind: AudioKind, file_name: &str) -> Result<PathBuf, AudioCacheError> {
        if !is_safe_file_name(file_name) {
            return Err(AudioCacheError::InvalidFileName);
        }
        let dir = match kind {
            AudioKind::Pronunciation => &self.pronunciation_dir,
            AudioKind::Intonation => &self.intonation_dir,
        };
        let path = dir.join(file_name);
        if !path.is_file() {
            return Err(AudioCacheError::NotFound);
        }
        Ok(path)
    }
}

fn is_safe_file_name(file_name: &str) -> bool {
    let Some(stem) = file_name.strip_suffix(".mp3") else {
        return false;
    };
    !stem.is_empty()
        && stem
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
        && Path::new(file_name).file_name().map(|n| n == file_name) == Some(true)
}
