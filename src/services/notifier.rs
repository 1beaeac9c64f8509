//! Deadline reminder scheduler
//!
//! A recurring task that scans the pending-review snapshot and reminds the
//! responsible mentors when a submission enters the 24-hour or 12-hour
//! window before its review deadline. Each window is ±0.3 h wide, narrower
//! than the scan interval, so a submission is expected to match on at most
//! one tick. There is no persisted "already notified" ledger: correctness
//! relies on the window/interval relation alone, which configuration
//! validation enforces at startup.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html;
use tracing::{error, info, warn};

use super::auth::AuthService;
use super::deadline;
use crate::models::Submission;
use crate::storage::SnapshotStore;
use crate::utils::errors::Result;

/// Half-width of a reminder window, hours.
pub const REMINDER_WINDOW_HALF_WIDTH_HOURS: f64 = 0.3;

/// Hours-left marks at which mentors are reminded.
pub const REMINDER_LEVELS: [u32; 2] = [24, 12];

/// An outbound reminder resolved to a concrete recipient.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub chat_id: ChatId,
    pub text: String,
}

/// Outcome of one scheduler tick.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Submissions that fell into a reminder window.
    pub matched: usize,
    pub sent: usize,
    pub failed: usize,
}

/// The reminder level whose window contains `hours_left`, if any.
pub fn reminder_level(hours_left: f64) -> Option<u32> {
    REMINDER_LEVELS.iter().copied().find(|&level| {
        let center = level as f64;
        hours_left >= center - REMINDER_WINDOW_HALF_WIDTH_HOURS
            && hours_left <= center + REMINDER_WINDOW_HALF_WIDTH_HOURS
    })
}

/// Pending submissions currently inside a reminder window, with the level
/// that matched.
pub fn due_submissions(
    submissions: &[Submission],
    now: DateTime<Utc>,
) -> Vec<(u32, &Submission)> {
    submissions
        .iter()
        .filter(|submission| submission.is_pending_review())
        .filter_map(|submission| {
            reminder_level(deadline::hours_left(submission.delivery_date, now))
                .map(|level| (level, submission))
        })
        .collect()
}

/// Reminder text for one submission; free-text fields are HTML-escaped
/// because the transport renders an HTML subset.
fn format_reminder(level: u32, submission: &Submission) -> String {
    format!(
        "⚠️ Напоминание\n\
         Осталось ~{} часов на проверку ДЗ\n\
         Ученик: {}\n\
         Задание: {}\n\
         Клан: {}",
        level,
        html::escape(&submission.student_name()),
        html::escape(submission.task_label()),
        submission.clan_id
    )
}

/// Recurring deadline reminder task.
#[derive(Debug, Clone)]
pub struct Notifier {
    bot: Bot,
    store: Arc<SnapshotStore>,
    auth: AuthService,
}

impl Notifier {
    /// Create a new Notifier instance
    pub fn new(bot: Bot, store: Arc<SnapshotStore>, auth: AuthService) -> Self {
        Self { bot, store, auth }
    }

    /// Resolve the reminders due at `now`: one per responsible mentor per
    /// matching submission.
    pub async fn pending_reminders(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>> {
        let homeworks = self.store.homeworks().await?;
        let due = due_submissions(&homeworks, now);

        let mut reminders = Vec::new();
        for (level, submission) in due {
            let text = format_reminder(level, submission);
            let chat_ids = self
                .auth
                .mentor_chat_ids_for_clan(submission.clan_id)
                .await?;

            if chat_ids.is_empty() {
                warn!(
                    submission_id = submission.id,
                    clan_id = submission.clan_id,
                    "Reminder due but no reachable mentors for the clan"
                );
            }

            for chat_id in chat_ids {
                reminders.push(Reminder {
                    chat_id,
                    text: text.clone(),
                });
            }
        }

        Ok(reminders)
    }

    /// One scheduler pass: select, resolve and deliver. A failed delivery
    /// is logged and counted, never aborting the rest of the batch.
    pub async fn tick(&self) -> Result<TickReport> {
        let now = Utc::now();
        let reminders = self.pending_reminders(now).await?;

        let mut report = TickReport {
            matched: reminders.len(),
            ..TickReport::default()
        };

        for reminder in reminders {
            match self
                .bot
                .send_message(reminder.chat_id, reminder.text)
                .parse_mode(ParseMode::Html)
                .await
            {
                Ok(_) => report.sent += 1,
                Err(e) => {
                    report.failed += 1;
                    error!(
                        chat_id = ?reminder.chat_id,
                        error = %e,
                        "Failed to deliver deadline reminder"
                    );
                }
            }
        }

        if report.matched > 0 {
            info!(
                matched = report.matched,
                sent = report.sent,
                failed = report.failed,
                "Reminder tick completed"
            );
        }

        Ok(report)
    }

    /// Run the scheduler forever with a fixed tick interval. Ticks are
    /// serialized by construction; missed ticks are delayed, not bunched,
    /// so a stalled runtime cannot fire twice inside one window.
    pub async fn run(self, tick_interval: Duration) {
        let mut interval = tokio::time::interval(tick_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(
            tick_seconds = tick_interval.as_secs(),
            "Reminder scheduler started"
        );

        loop {
            interval.tick().await;

            if let Err(e) = self.tick().await {
                error!(error = %e, "Reminder tick failed");
            }
        }
    }
}
