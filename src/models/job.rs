use chrono::{DateTime, Utc};
use tracing::debug;

use super::JobStatus;

/// Opaque job identifier assigned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to uploaded audio, as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadHandle(String);

impl UploadHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle state of a transcription job
///
/// `TimedOut` is never reported by the provider; the poller assigns it
/// when the deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Processing,
    Completed,
    Failed,
    TimedOut,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::TimedOut
        )
    }
}

/// A submitted job, owned by the poller while it runs
#[derive(Debug, Clone)]
pub struct TranscriptionJob {
    id: JobId,
    state: JobState,
    created_at: DateTime<Utc>,
}

impl TranscriptionJob {
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            state: JobState::Queued,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a status read from the provider.
    ///
    /// Terminal states are sticky and unrecognized statuses leave the
    /// state untouched. Returns whether the state changed.
    pub fn observe(&mut self, status: JobStatus) -> bool {
        if self.state.is_terminal() {
            return false;
        }

        let next = match status {
            JobStatus::Queued => JobState::Queued,
            JobStatus::Processing => JobState::Processing,
            JobStatus::Completed => JobState::Completed,
            JobStatus::Failed => JobState::Failed,
            JobStatus::Unknown => {
                debug!(job_id = %self.id, "Ignoring unrecognized job status");
                return false;
            }
        };

        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// Mark the job as abandoned by the local deadline
    pub fn time_out(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = JobState::TimedOut;
        true
    }
}
