//! Review deadline classification
//!
//! Pure functions mapping a submission and a reference instant to its
//! lifecycle phase. A submission must be reviewed within 72 hours of
//! delivery; the last 24 hours count as "expiring soon".

use chrono::{DateTime, Duration, Utc};

use crate::models::Submission;

/// Review deadline measured from the delivery instant, hours.
pub const REVIEW_DEADLINE_HOURS: i64 = 72;

/// A submission with at most this many hours left is expiring soon.
pub const EXPIRING_THRESHOLD_HOURS: f64 = 24.0;

/// Lifecycle phase of a pending submission relative to its review deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InTime,
    ExpiringSoon,
    Overdue,
}

/// Hours elapsed since the delivery instant. Negative when `now` precedes
/// the delivery (clock skew on the platform side).
pub fn hours_since_delivery(delivery: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - delivery).num_milliseconds() as f64 / 3_600_000.0
}

/// Hours left until the review deadline, clamped to zero.
pub fn hours_left(delivery: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let deadline = delivery + Duration::hours(REVIEW_DEADLINE_HOURS);
    ((deadline - now).num_milliseconds() as f64 / 3_600_000.0).max(0.0)
}

/// Classify a submission against its review deadline.
///
/// Returns `None` for submissions that are not pending review. The overdue
/// check runs first: `hours_left` is clamped and cannot distinguish
/// "exactly at the deadline" from "past it".
pub fn classify(submission: &Submission, now: DateTime<Utc>) -> Option<Phase> {
    if !submission.is_pending_review() {
        return None;
    }

    if hours_since_delivery(submission.delivery_date, now) > REVIEW_DEADLINE_HOURS as f64 {
        return Some(Phase::Overdue);
    }

    if hours_left(submission.delivery_date, now) <= EXPIRING_THRESHOLD_HOURS {
        return Some(Phase::ExpiringSoon);
    }

    Some(Phase::InTime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HomeworkInfo, Student, Submission, TaskType, STATUS_PENDING_REVIEW};

    fn submission(delivery: DateTime<Utc>, status: &str) -> Submission {
        Submission {
            id: 1,
            clan_id: 1,
            delivery_date: delivery,
            status: status.to_string(),
            user: Student {
                first_name: "Иван".to_string(),
                last_name: None,
            },
            homework: HomeworkInfo {
                kind: TaskType {
                    name: "Практика".to_string(),
                },
                lesson: None,
            },
        }
    }

    #[test]
    fn test_delivery_73_hours_ago_is_overdue() {
        let now = Utc::now();
        let sub = submission(now - Duration::hours(73), STATUS_PENDING_REVIEW);
        assert_eq!(classify(&sub, now), Some(Phase::Overdue));
    }

    #[test]
    fn test_delivery_49_hours_ago_is_expiring_soon() {
        let now = Utc::now();
        let sub = submission(now - Duration::hours(49), STATUS_PENDING_REVIEW);
        assert_eq!(classify(&sub, now), Some(Phase::ExpiringSoon));
    }

    #[test]
    fn test_delivery_one_hour_ago_is_in_time() {
        let now = Utc::now();
        let sub = submission(now - Duration::hours(1), STATUS_PENDING_REVIEW);
        assert_eq!(classify(&sub, now), Some(Phase::InTime));
    }

    #[test]
    fn test_exactly_at_deadline_is_expiring_soon() {
        let now = Utc::now();
        let sub = submission(now - Duration::hours(72), STATUS_PENDING_REVIEW);
        // hours_since == 72 exactly, not > 72; hours_left == 0 <= 24
        assert_eq!(classify(&sub, now), Some(Phase::ExpiringSoon));
    }

    #[test]
    fn test_non_pending_submission_is_not_classified() {
        let now = Utc::now();
        let sub = submission(now - Duration::hours(73), "Проверено");
        assert_eq!(classify(&sub, now), None);
    }

    #[test]
    fn test_hours_left_never_negative() {
        let now = Utc::now();
        assert_eq!(hours_left(now - Duration::days(365), now), 0.0);
        assert_eq!(hours_left(now - Duration::hours(100), now), 0.0);
    }

    #[test]
    fn test_hours_left_midrange() {
        let now = Utc::now();
        let left = hours_left(now - Duration::hours(48), now);
        assert!((left - 24.0).abs() < 1e-6);
    }

    #[test]
    fn test_hours_since_delivery_sign() {
        let now = Utc::now();
        assert!(hours_since_delivery(now - Duration::hours(2), now) > 1.9);
        assert!(hours_since_delivery(now + Duration::hours(2), now) < 0.0);
    }
}
