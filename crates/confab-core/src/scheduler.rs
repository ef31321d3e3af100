//! Cron-driven trigger for the retention policy.

use crate::services::retention::RetentionPolicy;
use anyhow::{Result, anyhow};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info};

/// Owns the scheduler instance and its single retention job.
pub struct RetentionScheduler {
    scheduler: JobScheduler,
}

impl RetentionScheduler {
    /// Create a scheduler with the retention job registered on `schedule`.
    pub async fn new(policy: Arc<RetentionPolicy>, schedule: &str) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| anyhow!("Failed to create JobScheduler: {}", e))?;

        let cron_expr = normalize_cron_expression(schedule);
        let job = Job::new_async(cron_expr.as_str(), move |_uuid, _l| {
            let policy = policy.clone();
            Box::pin(async move {
                debug!("Retention job triggered");
                match policy.try_run() {
                    Some(Ok(report)) => {
                        if report.deleted > 0 {
                            info!(
                                deleted = report.deleted,
                                remaining = report.remaining,
                                "Retention pass finished"
                            );
                        } else {
                            debug!(examined = report.examined, "Retention pass found nothing to delete");
                        }
                    }
                    Some(Err(e)) => {
                        error!(error = ?e, "Retention pass failed");
                    }
                    None => {
                        debug!("Retention pass still in flight, trigger dropped");
                    }
                }
            })
        })
        .map_err(|e| anyhow!("Failed to create retention job: {}", e))?;

        scheduler
            .add(job)
            .await
            .map_err(|e| anyhow!("Failed to add job to scheduler: {}", e))?;

        Ok(Self { scheduler })
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| anyhow!("Failed to start scheduler: {}", e))?;

        info!("RetentionScheduler started successfully");
        Ok(())
    }

    /// Shut down the scheduler
    pub async fn shutdown(&mut self) -> Result<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| anyhow!("Failed to shutdown scheduler: {}", e))?;

        info!("RetentionScheduler shutdown successfully");
        Ok(())
    }
}

/// Accept standard 5-field cron expressions by prepending seconds.
/// 6-field expressions pass through untouched.
pub fn normalize_cron_expression(expression: &str) -> String {
    let normalized = expression.trim();
    let field_count = normalized.split_whitespace().count();
    if field_count == 5 {
        format!("0 {}", normalized)
    } else {
        normalized.to_string()
    }
}
