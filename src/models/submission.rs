//! Homework submission model

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Platform status value marking a submission as awaiting mentor review.
///
/// The status field is an opaque platform token; this is the only value the
/// bot ever compares against.
pub const STATUS_PENDING_REVIEW: &str = "Ожидает проверки";

/// A homework submission scoped to the clan it was fetched for.
///
/// Submissions are replaced wholesale by a sync run and never mutated in
/// place. The review deadline is always derived from `delivery_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub clan_id: i64,
    #[serde(with = "utc_datetime")]
    pub delivery_date: DateTime<Utc>,
    pub status: String,
    pub user: Student,
    pub homework: HomeworkInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeworkInfo {
    #[serde(rename = "type")]
    pub kind: TaskType,
    #[serde(default)]
    pub lesson: Option<Lesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskType {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(default)]
    pub topic: Option<String>,
}

impl Submission {
    /// Whether this submission is still waiting for a mentor review.
    pub fn is_pending_review(&self) -> bool {
        self.status == STATUS_PENDING_REVIEW
    }

    /// Student display name, `"??"` when both name parts are blank.
    pub fn student_name(&self) -> String {
        let last = self.user.last_name.as_deref().unwrap_or("");
        let full = format!("{} {}", self.user.first_name.trim(), last.trim());
        let full = full.trim();
        if full.is_empty() {
            "??".to_string()
        } else {
            full.to_string()
        }
    }

    /// Task label: the lesson topic, falling back to the homework type name.
    pub fn task_label(&self) -> &str {
        self.homework
            .lesson
            .as_ref()
            .and_then(|lesson| lesson.topic.as_deref())
            .filter(|topic| !topic.trim().is_empty())
            .unwrap_or(&self.homework.kind.name)
    }
}

/// Parse platform timestamps like `2025-09-21T22:02:06.000000Z`.
///
/// Naive timestamps (no offset) are assumed to be UTC.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}

/// Serde adapter for `delivery_date`: RFC 3339 out, lenient UTC in.
pub(crate) mod utc_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_utc(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn wire_submission() -> serde_json::Value {
        serde_json::json!({
            "id": 101,
            "clan_id": 7,
            "delivery_date": "2025-09-21T22:02:06.000000Z",
            "status": "Ожидает проверки",
            "user": {"first_name": "Мария", "last_name": "Иванова"},
            "homework": {
                "type": {"name": "Практика"},
                "lesson": {"topic": "Квадратные уравнения"}
            }
        })
    }

    #[test]
    fn test_wire_deserialization() {
        let submission: Submission = serde_json::from_value(wire_submission()).unwrap();
        assert_eq!(submission.id, 101);
        assert!(submission.is_pending_review());
        assert_eq!(submission.delivery_date.hour(), 22);
        assert_eq!(submission.student_name(), "Мария Иванова");
    }

    #[test]
    fn test_naive_delivery_date_assumed_utc() {
        let mut value = wire_submission();
        value["delivery_date"] = serde_json::json!("2025-09-21T22:02:06.000000");
        let submission: Submission = serde_json::from_value(value).unwrap();
        assert_eq!(
            submission.delivery_date,
            parse_utc("2025-09-21T22:02:06.000000Z").unwrap()
        );
    }

    #[test]
    fn test_task_label_falls_back_to_type_name() {
        let mut value = wire_submission();
        value["homework"]["lesson"] = serde_json::json!(null);
        let submission: Submission = serde_json::from_value(value).unwrap();
        assert_eq!(submission.task_label(), "Практика");

        let mut value = wire_submission();
        value["homework"]["lesson"]["topic"] = serde_json::json!(null);
        let submission: Submission = serde_json::from_value(value).unwrap();
        assert_eq!(submission.task_label(), "Практика");

        let submission: Submission = serde_json::from_value(wire_submission()).unwrap();
        assert_eq!(submission.task_label(), "Квадратные уравнения");
    }

    #[test]
    fn test_student_name_fallback() {
        let mut value = wire_submission();
        value["user"] = serde_json::json!({"first_name": "  ", "last_name": null});
        let submission: Submission = serde_json::from_value(value).unwrap();
        assert_eq!(submission.student_name(), "??");
    }

    #[test]
    fn test_unknown_status_is_passed_through() {
        let mut value = wire_submission();
        value["status"] = serde_json::json!("Проверено");
        let submission: Submission = serde_json::from_value(value).unwrap();
        assert!(!submission.is_pending_review());
        assert_eq!(submission.status, "Проверено");
    }
}
