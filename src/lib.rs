pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod sentiment;
pub mod stages;

pub use error::{CallError, Result};
pub use io::{format_sentiment, format_transcript, load_audio_asset, write_sentiment, write_transcript};
pub use models::{
    AudioAsset, JobId, JobState, JobStatus, SentimentResult, TranscriptPayload, TranscriptionJob,
    Utterance,
};
pub use pipeline::{process_call, PipelineConfig, ProcessingResult};
pub use provider::{AssemblyAiClient, ProviderConfig, TranscriptionOptions, TranscriptionProvider};
pub use sentiment::{classify, LexiconScorer, PolarityScorer};
pub use stages::{
    execute_stage1, execute_stage2, execute_stage3, execute_stage4, extract_agent_text,
    precondition, summarize, Clock, PollConfig, PreconditionConfig, TokioClock,
};
