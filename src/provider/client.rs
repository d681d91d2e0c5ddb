use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use tracing::{debug, warn};

use crate::error::{CallError, Result};
use crate::models::{
    CreatedTranscript, JobId, TranscriptPayload, TranscriptRequest, UploadHandle, UploadResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";
pub const API_KEY_ENV: &str = "ASSEMBLYAI_API_KEY";
pub const BASE_URL_ENV: &str = "ASSEMBLYAI_BASE_URL";
/// Stand-in key so the binary starts without configuration; the provider rejects it
pub const PLACEHOLDER_API_KEY: &str = "assemblyai-api-key-not-configured";

/// Configuration for the transcription provider client
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API key (from ASSEMBLYAI_API_KEY env var)
    pub api_key: String,
    /// Base URL of the v2 API
    pub base_url: String,
    /// Language code requested for every job (e.g., "pt")
    pub language_code: String,
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
    /// Total time allowed for a submit or status request; uploads are exempt
    pub request_timeout: Duration,
}

impl ProviderConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| {
                warn!(
                    "{} not set; using placeholder key, requests will be rejected",
                    API_KEY_ENV
                );
                PLACEHOLDER_API_KEY.to_string()
            });
        let base_url = lookup(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self::new(api_key, base_url)
    }

    /// Create with custom settings
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            language_code: "pt".to_string(),
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(300),
        }
    }

    pub fn uses_placeholder_key(&self) -> bool {
        self.api_key == PLACEHOLDER_API_KEY
    }
}

/// Options sent with every transcription request
#[derive(Debug, Clone)]
pub struct TranscriptionOptions {
    pub speaker_labels: bool,
    pub punctuate: bool,
    pub format_text: bool,
    pub language_code: String,
}

impl TranscriptionOptions {
    pub fn diarized(language_code: impl Into<String>) -> Self {
        Self {
            speaker_labels: true,
            punctuate: true,
            format_text: true,
            language_code: language_code.into(),
        }
    }
}

impl Default for TranscriptionOptions {
    fn default() -> Self {
        Self::diarized("pt")
    }
}

/// The three provider operations the pipeline consumes
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Upload an audio file, returning a reference usable in `submit`
    async fn upload(&self, audio: &Path, mime_type: &str) -> Result<UploadHandle>;

    /// Request a transcription job for uploaded audio
    async fn submit(&self, upload: &UploadHandle, options: &TranscriptionOptions)
        -> Result<JobId>;

    /// Read the current state of a job
    async fn fetch(&self, job_id: &JobId) -> Result<TranscriptPayload>;
}

/// AssemblyAI v2 API client
pub struct AssemblyAiClient {
    client: Client,
    config: ProviderConfig,
}

impl AssemblyAiClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

#[async_trait]
impl TranscriptionProvider for AssemblyAiClient {
    async fn upload(&self, audio: &Path, mime_type: &str) -> Result<UploadHandle> {
        let file = tokio::fs::File::open(audio).await?;
        let length = file.metadata().await?.len();
        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        debug!(path = %audio.display(), bytes = length, "Uploading audio");

        let part = multipart::Part::stream_with_length(file, length)
            .file_name(file_name)
            .mime_str(mime_type)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/upload"))
            .header("authorization", &self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = status_and_body(response).await;
            return Err(CallError::Upload { status, body });
        }

        let response: UploadResponse = response.json().await?;
        Ok(UploadHandle::new(response.upload_url))
    }

    async fn submit(
        &self,
        upload: &UploadHandle,
        options: &TranscriptionOptions,
    ) -> Result<JobId> {
        let request = TranscriptRequest {
            audio_url: upload.as_str().to_string(),
            speaker_labels: options.speaker_labels,
            punctuate: options.punctuate,
            format_text: options.format_text,
            language_code: options.language_code.clone(),
        };

        let response = self
            .client
            .post(self.url("/transcript"))
            .timeout(self.config.request_timeout)
            .header("authorization", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = status_and_body(response).await;
            return Err(CallError::Submission { status, body });
        }

        let response: CreatedTranscript = response.json().await?;
        Ok(JobId::new(response.id))
    }

    async fn fetch(&self, job_id: &JobId) -> Result<TranscriptPayload> {
        let response = self
            .client
            .get(self.url(&format!("/transcript/{}", job_id)))
            .timeout(self.config.request_timeout)
            .header("authorization", &self.config.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let http_status = response.status();
            let retryable = http_status.is_server_error()
                || http_status == reqwest::StatusCode::TOO_MANY_REQUESTS;
            let (status, body) = status_and_body(response).await;
            return Err(CallError::Transport {
                message: format!("status query for job {} returned {} - {}", job_id, status, body),
                retryable,
            });
        }

        Ok(response.json().await?)
    }
}

async fn status_and_body(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    (status, body)
}
