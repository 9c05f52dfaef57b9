//! Canva job polling
//!
//! Asset uploads and exports complete asynchronously on Canva's side. A job
//! is polled at a fixed interval until it reaches a terminal status, and the
//! whole wait is bounded by a timeout.

use std::future::Future;
use std::time::Duration;

use reelcast_client::{ClientError, JobStatus, ProviderJob};
use reelcast_core::domain::log::PipelineStep;
use tracing::debug;

use crate::service::pipeline::PipelineError;

/// Bounds for waiting on a provider job
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

/// Wait until `job` succeeds, fails, or the policy's timeout elapses
///
/// `fetch` is called with the job id to refresh the status. The first
/// status check uses the job as returned by the call that started it.
pub async fn wait_for_job<J, F, Fut>(
    step: PipelineStep,
    job: J,
    policy: PollPolicy,
    mut fetch: F,
) -> Result<J, PipelineError>
where
    J: ProviderJob,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<J, ClientError>>,
{
    let wait = async {
        let mut job = job;
        let mut checks = 1u32;
        loop {
            match job.status() {
                JobStatus::Success => return Ok(job),
                JobStatus::Failed => {
                    let reason = job.error_message().unwrap_or("no reason given");
                    return Err(PipelineError::external(
                        step,
                        format!("Canva job {} failed: {}", job.id(), reason),
                    ));
                }
                JobStatus::InProgress => {
                    debug!("{} job {} still in progress (check {})", step, job.id(), checks);
                }
            }

            tokio::time::sleep(policy.interval).await;
            job = fetch(job.id().to_string())
                .await
                .map_err(|e| PipelineError::from_client(step, e))?;
            checks += 1;
        }
    };

    match tokio::time::timeout(policy.timeout, wait).await {
        Ok(outcome) => outcome,
        Err(_) => Err(PipelineError::Timeout {
            step,
            waited: policy.timeout,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcast_client::ExportJob;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn job(status: JobStatus) -> ExportJob {
        ExportJob {
            id: "E1".to_string(),
            status,
            urls: vec![],
            error: None,
        }
    }

    fn fast_policy() -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(1),
            timeout: Duration::from_millis(200),
        }
    }

    #[tokio::test]
    async fn test_already_finished_job_is_not_polled() {
        let calls = AtomicU32::new(0);
        let result = wait_for_job(
            PipelineStep::CanvaExport,
            job(JobStatus::Success),
            fast_policy(),
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(job(JobStatus::Success)) }
            },
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_polls_until_success() {
        let calls = AtomicU32::new(0);
        let result = wait_for_job(
            PipelineStep::CanvaExport,
            job(JobStatus::InProgress),
            fast_policy(),
            |_| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    Ok(job(if n < 3 {
                        JobStatus::InProgress
                    } else {
                        JobStatus::Success
                    }))
                }
            },
        )
        .await;

        assert_eq!(result.unwrap().status, JobStatus::Success);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_job_is_external_error() {
        let result = wait_for_job(
            PipelineStep::CanvaUpload,
            job(JobStatus::InProgress),
            fast_policy(),
            |_| async { Ok(job(JobStatus::Failed)) },
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, PipelineError::ExternalService { step: PipelineStep::CanvaUpload, .. }));
        assert!(err.to_string().contains("Canva job E1 failed"));
    }

    #[tokio::test]
    async fn test_times_out() {
        let policy = PollPolicy {
            interval: Duration::from_millis(5),
            timeout: Duration::from_millis(30),
        };
        let result = wait_for_job(
            PipelineStep::CanvaExport,
            job(JobStatus::InProgress),
            policy,
            |_| async { Ok(job(JobStatus::InProgress)) },
        )
        .await;

        assert!(matches!(
            result,
            Err(PipelineError::Timeout { step: PipelineStep::CanvaExport, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let result = wait_for_job(
            PipelineStep::CanvaExport,
            job(JobStatus::InProgress),
            fast_policy(),
            |_| async { Err::<ExportJob, _>(ClientError::api_error(500, "Canva is down")) },
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Canva is down"));
    }
}
