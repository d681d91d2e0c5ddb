use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::{CallError, Result};
use crate::models::{JobState, TranscriptPayload, TranscriptionJob};
use crate::provider::TranscriptionProvider;

/// Configuration for Stage 2 polling
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Overall deadline measured from the first status query
    pub timeout: Duration,
    /// Fixed wait between status queries
    pub interval: Duration,
    /// Consecutive transient transport failures tolerated before giving up
    pub max_transient_errors: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3600),
            interval: Duration::from_secs(10),
            max_transient_errors: 3,
        }
    }
}

/// Time source for the poller
#[async_trait]
pub trait Clock: Send + Sync {
    /// Monotonic time since an arbitrary origin
    fn now(&self) -> Duration;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by tokio's timer
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Result of Stage 2 polling
#[derive(Debug)]
pub struct Stage2Result {
    /// The completed job payload, unchanged from the provider
    pub payload: TranscriptPayload,
    /// Number of status queries issued
    pub queries: u32,
    /// Time from first query to completion
    pub elapsed: Duration,
}

/// Execute Stage 2: poll the job until it reaches a terminal state
///
/// Each iteration after the first checks the deadline before querying,
/// so once the deadline has passed no further queries are sent. Transient
/// transport failures count against `max_transient_errors` and are retried
/// on the normal interval; any successful read resets the count.
pub async fn execute_stage2(
    provider: &dyn TranscriptionProvider,
    clock: &dyn Clock,
    job: &mut TranscriptionJob,
    config: &PollConfig,
) -> Result<Stage2Result> {
    info!("Waiting for transcription job {} to complete", job.id());

    let started = clock.now();
    let mut queries: u32 = 0;
    let mut transient_errors: u32 = 0;

    loop {
        let elapsed = clock.now().saturating_sub(started);
        if queries > 0 && elapsed > config.timeout {
            job.time_out();
            warn!(job_id = %job.id(), queries, "Transcription timed out after {:?}", elapsed);
            return Err(CallError::TranscriptionTimeout {
                job_id: job.id().to_string(),
                elapsed,
            });
        }

        queries += 1;
        match provider.fetch(job.id()).await {
            Ok(payload) => {
                transient_errors = 0;
                let changed = job.observe(payload.status);
                info!(job_id = %job.id(), status = %payload.status, "Transcription status");
                if changed {
                    debug!(job_id = %job.id(), state = ?job.state(), "Job state changed");
                }

                match job.state() {
                    JobState::Completed => {
                        info!(
                            "Transcription completed after {} queries ({:.0}s)",
                            queries,
                            elapsed.as_secs_f64()
                        );
                        return Ok(Stage2Result {
                            payload,
                            queries,
                            elapsed,
                        });
                    }
                    JobState::Failed => {
                        return Err(CallError::TranscriptionFailed {
                            job_id: job.id().to_string(),
                            reason: payload
                                .error
                                .unwrap_or_else(|| "no reason reported".to_string()),
                        });
                    }
                    _ => {}
                }
            }
            Err(e) if e.is_retryable() && transient_errors < config.max_transient_errors => {
                transient_errors += 1;
                warn!(
                    "Status query {} failed ({}/{} transient): {}",
                    queries, transient_errors, config.max_transient_errors, e
                );
            }
            Err(e) => return Err(e),
        }

        clock.sleep(config.interval).await;
    }
}

/// Clock that only advances when slept on
#[cfg(test)]
pub(crate) struct ManualClock {
    now: std::sync::Mutex<Duration>,
    pub sleeps: std::sync::Mutex<Vec<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            now: std::sync::Mutex::new(Duration::ZERO),
            sleeps: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        *self.now.lock().unwrap() += duration;
    }
}
