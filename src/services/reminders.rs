use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::models::appointment::{self, DATE_FORMAT};
use crate::services::messaging::MessagingProvider;

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderJob {
    pub id: Uuid,
    pub user_id: i64,
    pub date: NaiveDate,
    pub time: String,
}

impl ReminderJob {
    pub fn new(user_id: i64, date: NaiveDate, time: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            time: time.to_string(),
        }
    }

    pub fn message(&self) -> String {
        format!(
            "⏰ Reminder!\n\nYou have an appointment in 1 hour.\n{} {}",
            self.date.format(DATE_FORMAT),
            self.time
        )
    }
}

/// One-shot delayed execution of reminder jobs.
///
/// Jobs live only in memory; nothing survives a restart.
pub trait JobScheduler: Send + Sync {
    fn schedule_once(&self, fire_at: NaiveDateTime, job: ReminderJob) -> anyhow::Result<()>;
}

/// Runs each job on its own tokio task that sleeps until the local wall-clock instant.
pub struct TokioJobScheduler {
    messaging: Arc<dyn MessagingProvider>,
}

impl TokioJobScheduler {
    pub fn new(messaging: Arc<dyn MessagingProvider>) -> Self {
        Self { messaging }
    }
}

impl JobScheduler for TokioJobScheduler {
    fn schedule_once(&self, fire_at: NaiveDateTime, job: ReminderJob) -> anyhow::Result<()> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| anyhow::anyhow!("no tokio runtime for reminder job: {e}"))?;
        let messaging = Arc::clone(&self.messaging);

        handle.spawn(async move {
            let delay = (fire_at - Local::now().naive_local())
                .to_std()
                .unwrap_or_default();
            tokio::time::sleep(delay).await;

            match messaging
                .send_message(job.user_id, &job.message(), None)
                .await
            {
                Ok(()) => tracing::info!(job_id = %job.id, user_id = job.user_id, "reminder sent"),
                Err(e) => {
                    tracing::error!(error = %e, job_id = %job.id, user_id = job.user_id, "failed to send reminder")
                }
            }
        });

        Ok(())
    }
}

/// Appointment start minus the lead time, or `None` for an unparseable time label.
pub fn reminder_fire_time(date: NaiveDate, time: &str, lead_minutes: i64) -> Option<NaiveDateTime> {
    appointment::starts_at(date, time).map(|start| start - Duration::minutes(lead_minutes))
}

/// Registers a reminder when its fire time is still ahead of `now`.
///
/// Returns whether a job was registered.
pub fn schedule_reminder(
    scheduler: &dyn JobScheduler,
    user_id: i64,
    date: NaiveDate,
    time: &str,
    lead_minutes: i64,
    now: NaiveDateTime,
) -> anyhow::Result<bool> {
    let Some(fire_at) = reminder_fire_time(date, time, lead_minutes) else {
        tracing::warn!(user_id, %date, time, "cannot compute reminder time");
        return Ok(false);
    };

    if fire_at <= now {
        tracing::debug!(user_id, %date, time, "appointment too close, no reminder");
        return Ok(false);
    }

    let job = ReminderJob::new(user_id, date, time);
    tracing::info!(job_id = %job.id, user_id, %fire_at, "scheduling reminder");
    scheduler.schedule_once(fire_at, job)?;
    Ok(true)
}
