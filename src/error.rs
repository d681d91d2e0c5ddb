use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Every way a single call-processing run can fail
#[derive(Error, Debug)]
pub enum CallError {
    #[error("File {} does not appear to be an audio file", .path.display())]
    NotAudio { path: PathBuf },

    #[error("Audio processing failed for {}: {message}", .path.display())]
    AudioProcessing { path: PathBuf, message: String },

    #[error("Audio upload rejected: {status} - {body}")]
    Upload { status: u16, body: String },

    #[error("Transcription request rejected: {status} - {body}")]
    Submission { status: u16, body: String },

    #[error("Transcription job {job_id} failed: {reason}")]
    TranscriptionFailed { job_id: String, reason: String },

    #[error("Transcription job {job_id} timed out after {}s", .elapsed.as_secs())]
    TranscriptionTimeout { job_id: String, elapsed: Duration },

    #[error("Transcript contains no utterances; check that speaker diarization was enabled")]
    EmptyTranscript,

    #[error("Transport error: {message}")]
    Transport { message: String, retryable: bool },

    #[error("Failed to write report to {}: {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CallError>;

impl CallError {
    /// Whether the poller may re-query after this error
    pub fn is_retryable(&self) -> bool {
        matches!(self, CallError::Transport { retryable: true, .. })
    }

    pub(crate) fn audio(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        CallError::AudioProcessing {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<reqwest::Error> for CallError {
    fn from(err: reqwest::Error) -> Self {
        let retryable = err.is_timeout()
            || err.is_connect()
            || err.status().is_some_and(|s| s.is_server_error());
        CallError::Transport {
            message: err.to_string(),
            retryable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_audio_display() {
        let err = CallError::NotAudio {
            path: PathBuf::from("/tmp/notes.txt"),
        };
        assert_eq!(
            err.to_string(),
            "File /tmp/notes.txt does not appear to be an audio file"
        );
    }

    #[test]
    fn test_timeout_display_uses_seconds() {
        let err = CallError::TranscriptionTimeout {
            job_id: "job-1".to_string(),
            elapsed: Duration::from_millis(3_600_500),
        };
        assert_eq!(err.to_string(), "Transcription job job-1 timed out after 3600s");
    }

    #[test]
    fn test_only_retryable_transport_is_retryable() {
        let transient = CallError::Transport {
            message: "503".to_string(),
            retryable: true,
        };
        let fatal = CallError::Transport {
            message: "404".to_string(),
            retryable: false,
        };
        assert!(transient.is_retryable());
        assert!(!fatal.is_retryable());
        assert!(!CallError::EmptyTranscript.is_retryable());
    }
}
