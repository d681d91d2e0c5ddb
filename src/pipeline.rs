use std::path::Path;

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{JobId, SentimentResult, TranscriptPayload};
use crate::provider::{TranscriptionOptions, TranscriptionProvider};
use crate::sentiment::{classify, PolarityScorer};
use crate::stages::{
    execute_stage1, execute_stage2, execute_stage3, precondition, Clock, PollConfig,
    PreconditionConfig, DEFAULT_AGENT_LABEL,
};

/// Configuration for a whole run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub precondition: PreconditionConfig,
    pub poll: PollConfig,
    pub options: TranscriptionOptions,
    /// Speaker label attributed to the service agent
    pub agent_label: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            precondition: PreconditionConfig::default(),
            poll: PollConfig::default(),
            options: TranscriptionOptions::default(),
            agent_label: DEFAULT_AGENT_LABEL.to_string(),
        }
    }
}

/// Everything a run produces, ready to be rendered
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub job_id: JobId,
    /// Speaker-attributed transcript lines
    pub transcript_summary: String,
    pub agent_text: String,
    pub sentiment: SentimentResult,
}

/// Process one recorded call from audio file to sentiment result
///
/// The padded temp audio lives only for the duration of the submission
/// and is removed on every exit path, success or failure.
pub async fn process_call(
    provider: &dyn TranscriptionProvider,
    clock: &dyn Clock,
    scorer: &dyn PolarityScorer,
    audio_path: &Path,
    config: &PipelineConfig,
) -> Result<ProcessingResult> {
    let run_id = Uuid::new_v4();
    let span = info_span!("call", %run_id);

    async move {
        info!("Processing {:?}", audio_path);
        let payload = transcribe(provider, clock, audio_path, config).await?;

        let extracted = execute_stage3(&payload, &config.agent_label)?;
        let sentiment = classify(&extracted.agent_text, scorer);

        Ok(ProcessingResult {
            job_id: JobId::new(payload.id),
            transcript_summary: extracted.summary,
            agent_text: extracted.agent_text,
            sentiment,
        })
    }
    .instrument(span)
    .await
}

/// Stages 0-2: precondition, submit and wait for the completed payload
async fn transcribe(
    provider: &dyn TranscriptionProvider,
    clock: &dyn Clock,
    audio_path: &Path,
    config: &PipelineConfig,
) -> Result<TranscriptPayload> {
    let mut submitted = {
        let audio = precondition(audio_path, &config.precondition)?;
        execute_stage1(provider, &audio, &config.options).await?
    };
    info!("Removed temporary audio; job {} submitted", submitted.job.id());

    let polled = execute_stage2(provider, clock, &mut submitted.job, &config.poll).await?;
    Ok(polled.payload)
}
