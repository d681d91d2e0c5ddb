use tracing::info;

use crate::error::Result;
use crate::models::{JobId, TranscriptionJob, UploadHandle};
use crate::provider::{TranscriptionOptions, TranscriptionProvider};

use super::PreparedAudio;

/// Result of Stage 1 submission
#[derive(Debug)]
pub struct Stage1Result {
    /// Where the provider stored the audio
    pub upload: UploadHandle,
    /// The freshly created job, ready for polling
    pub job: TranscriptionJob,
}

/// Execute Stage 1: upload audio and request a diarized transcription
pub async fn execute_stage1(
    provider: &dyn TranscriptionProvider,
    audio: &PreparedAudio,
    options: &TranscriptionOptions,
) -> Result<Stage1Result> {
    info!("Uploading {:?} ({:.1}s)", audio.path(), audio.padded_seconds);
    let upload = provider.upload(audio.path(), audio.mime_type()).await?;
    info!("Upload complete: {}", upload.as_str());

    info!(
        "Requesting transcription (language={}, speaker_labels={})",
        options.language_code, options.speaker_labels
    );
    let job_id: JobId = provider.submit(&upload, options).await?;
    info!("Transcription job id: {}", job_id);

    Ok(Stage1Result {
        upload,
        job: TranscriptionJob::new(job_id),
    })
}
