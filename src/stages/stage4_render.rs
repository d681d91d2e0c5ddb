use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::io::{write_sentiment, write_transcript};
use crate::pipeline::ProcessingResult;

/// Result of Stage 4 rendering
#[derive(Debug)]
pub struct Stage4Result {
    pub transcript_path: PathBuf,
    pub sentiment_path: PathBuf,
}

/// Execute Stage 4: Rendering
///
/// Produces two plain-text reports:
/// 1. Transcript: header line and one line per utterance
/// 2. Sentiment: header line and the agent's classification fields
pub fn execute_stage4(
    result: &ProcessingResult,
    transcript_path: &Path,
    sentiment_path: &Path,
) -> Result<Stage4Result> {
    info!("Writing transcript to {:?}", transcript_path);
    write_transcript(&result.transcript_summary, transcript_path)?;

    info!("Writing sentiment analysis to {:?}", sentiment_path);
    write_sentiment(&result.sentiment, sentiment_path)?;

    Ok(Stage4Result {
        transcript_path: transcript_path.to_path_buf(),
        sentiment_path: sentiment_path.to_path_buf(),
    })
}
