pub mod client;

pub use client::*;

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::{TranscriptionOptions, TranscriptionProvider};
    use crate::error::{CallError, Result};
    use crate::models::{JobId, JobStatus, TranscriptPayload, UploadHandle, Utterance};

    /// In-memory provider that replays a fixed sequence of status reads
    pub struct ScriptedProvider {
        statuses: Mutex<VecDeque<Result<TranscriptPayload>>>,
        pub fetch_count: AtomicUsize,
        pub uploaded: Mutex<Option<PathBuf>>,
        pub upload_existed: Mutex<bool>,
        pub submitted: Mutex<Option<TranscriptionOptions>>,
        pub reject_submit: bool,
    }

    impl ScriptedProvider {
        pub fn new(statuses: Vec<Result<TranscriptPayload>>) -> Self {
            Self {
                statuses: Mutex::new(statuses.into()),
                fetch_count: AtomicUsize::new(0),
                uploaded: Mutex::new(None),
                upload_existed: Mutex::new(false),
                submitted: Mutex::new(None),
                reject_submit: false,
            }
        }

        pub fn rejecting_submit() -> Self {
            Self {
                reject_submit: true,
                ..Self::new(Vec::new())
            }
        }

        pub fn fetches(&self) -> usize {
            self.fetch_count.load(Ordering::SeqCst)
        }

        pub fn uploaded_path(&self) -> Option<PathBuf> {
            self.uploaded.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TranscriptionProvider for ScriptedProvider {
        async fn upload(&self, audio: &Path, _mime_type: &str) -> Result<UploadHandle> {
            *self.upload_existed.lock().unwrap() = audio.exists();
            *self.uploaded.lock().unwrap() = Some(audio.to_path_buf());
            Ok(UploadHandle::new("https://cdn.example/upload/scripted"))
        }

        async fn submit(
            &self,
            _upload: &UploadHandle,
            options: &TranscriptionOptions,
        ) -> Result<JobId> {
            if self.reject_submit {
                return Err(CallError::Submission {
                    status: 400,
                    body: "bad request".to_string(),
                });
            }
            *self.submitted.lock().unwrap() = Some(options.clone());
            Ok(JobId::new("job-scripted"))
        }

        async fn fetch(&self, _job_id: &JobId) -> Result<TranscriptPayload> {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(status(JobStatus::Processing)))
        }
    }

    /// A payload carrying only a status
    pub fn status(status: JobStatus) -> TranscriptPayload {
        TranscriptPayload {
            id: "job-scripted".to_string(),
            status,
            utterances: None,
            text: None,
            error: None,
            audio_duration: None,
        }
    }

    /// A completed payload with the given (speaker, text) utterances
    pub fn completed(utterances: &[(&str, &str)]) -> TranscriptPayload {
        TranscriptPayload {
            utterances: Some(
                utterances
                    .iter()
                    .map(|(speaker, text)| Utterance::new(*speaker, *text))
                    .collect(),
            ),
            ..status(JobStatus::Completed)
        }
    }

    pub fn transient_error() -> CallError {
        CallError::Transport {
            message: "status query returned 503".to_string(),
            retryable: true,
        }
    }
}
