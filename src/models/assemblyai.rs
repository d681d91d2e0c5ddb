use serde::{Deserialize, Serialize};

use crate::error::{CallError, Result};

/// Job status as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    /// The provider reports this as `error`; `failed` is accepted too
    #[serde(alias = "error")]
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Response from `POST /upload`
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub upload_url: String,
}

/// Body of `POST /transcript`
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptRequest {
    pub audio_url: String,
    pub speaker_labels: bool,
    pub punctuate: bool,
    pub format_text: bool,
    pub language_code: String,
}

/// Response from `POST /transcript`; only the id matters at submission time
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTranscript {
    pub id: String,
}

/// A single diarized span of speech
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Utterance {
    /// Speaker label assigned by diarization (e.g. "SPEAKER_1", "A")
    pub speaker: String,
    pub text: String,
    /// Start offset in milliseconds
    #[serde(default)]
    pub start: Option<u64>,
    /// End offset in milliseconds
    #[serde(default)]
    pub end: Option<u64>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl Utterance {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            start: None,
            end: None,
            confidence: None,
        }
    }
}

/// Response from `GET /transcript/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TranscriptPayload {
    pub id: String,
    pub status: JobStatus,
    /// Null until the job completes, and absent when diarization was off
    #[serde(default)]
    pub utterances: Option<Vec<Utterance>>,
    #[serde(default)]
    pub text: Option<String>,
    /// Provider-supplied failure reason
    #[serde(default)]
    pub error: Option<String>,
    /// Audio duration in seconds
    #[serde(default)]
    pub audio_duration: Option<f64>,
}

impl TranscriptPayload {
    /// Ordered utterances, failing when there are none
    pub fn utterances(&self) -> Result<&[Utterance]> {
        match self.utterances.as_deref() {
            Some(list) if !list.is_empty() => Ok(list),
            _ => Err(CallError::EmptyTranscript),
        }
    }
}
