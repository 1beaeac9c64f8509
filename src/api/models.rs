//! Wire shapes of the mentoring platform API

use serde::{Deserialize, Deserializer};

use crate::models::{Clan, Course, HomeworkInfo, Mentor, Student, Submission};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// One page of a paginated listing: `{ "data": [...], "meta": {...} }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Paged<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// A mentor as the platform returns it, before cleaning.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMentor {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub telegram_id: Option<i64>,
    #[serde(default)]
    pub telegram_tag: Option<String>,
    #[serde(default, rename = "clansMentor")]
    pub clans_mentor: Vec<Clan>,
    #[serde(default)]
    pub courses: Vec<ApiCourse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCourse {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subject: Option<ApiSubject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSubject {
    #[serde(default)]
    pub name: Option<String>,
}

/// A homework submission as fetched for one clan; the clan id is attached
/// by the sync orchestrator since the endpoint is already clan-scoped.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSubmission {
    pub id: i64,
    #[serde(with = "crate::models::submission::utc_datetime")]
    pub delivery_date: chrono::DateTime<chrono::Utc>,
    pub status: String,
    pub user: Student,
    pub homework: HomeworkInfo,
}

impl ApiMentor {
    /// Normalize the platform record into the snapshot shape.
    pub fn into_mentor(self) -> Mentor {
        let first = self.first_name.clone().unwrap_or_default();
        let last = self.last_name.clone().unwrap_or_default();
        let full_name = format!("{} {}", first, last).trim().to_string();

        Mentor {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            full_name,
            email: self.email,
            phone: self.phone,
            telegram_id: self.telegram_id,
            telegram_tag: self.telegram_tag,
            clans_mentor: self.clans_mentor,
            courses: self
                .courses
                .into_iter()
                .map(|course| Course {
                    id: course.id,
                    name: course.name,
                    subject: course.subject.and_then(|subject| subject.name),
                })
                .collect(),
        }
    }
}

impl ApiSubmission {
    pub fn into_submission(self, clan_id: i64) -> Submission {
        Submission {
            id: self.id,
            clan_id,
            delivery_date: self.delivery_date,
            status: self.status,
            user: self.user,
            homework: self.homework,
        }
    }
}

/// The platform is inconsistent about numeric ids: accept both a number
/// and a numeric string.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentor_cleaning_builds_full_name() {
        let raw = serde_json::json!({
            "id": 5,
            "first_name": "Анна",
            "last_name": "Петрова",
            "telegram_tag": "@anna",
            "telegram_id": "1001",
            "clansMentor": [{"id": 3, "name": "Альфа"}],
            "courses": [{"id": 9, "name": "Алгебра", "subject": {"name": "Математика"}}]
        });

        let mentor = serde_json::from_value::<ApiMentor>(raw).unwrap().into_mentor();
        assert_eq!(mentor.full_name, "Анна Петрова");
        assert_eq!(mentor.telegram_id, Some(1001));
        assert_eq!(mentor.clan_ids(), vec![3]);
        assert_eq!(mentor.courses[0].subject.as_deref(), Some("Математика"));
    }

    #[test]
    fn test_lenient_telegram_id() {
        let numeric: ApiMentor =
            serde_json::from_value(serde_json::json!({"id": 1, "telegram_id": 42})).unwrap();
        assert_eq!(numeric.telegram_id, Some(42));

        let missing: ApiMentor = serde_json::from_value(serde_json::json!({"id": 1})).unwrap();
        assert_eq!(missing.telegram_id, None);

        let garbage: ApiMentor =
            serde_json::from_value(serde_json::json!({"id": 1, "telegram_id": "abc"})).unwrap();
        assert_eq!(garbage.telegram_id, None);
    }

    #[test]
    fn test_paged_defaults() {
        let page: Paged<ApiMentor> = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.meta.last_page, None);
    }
}
