//! Homework dashboard service
//!
//! Builds the user-facing summaries over the pending-review snapshot: the
//! per-clan totals with an overdue breakdown, and the list of submissions
//! expiring within the next 24 hours.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use teloxide::utils::html;

use super::auth::AuthService;
use super::deadline::{self, Phase};
use crate::models::Submission;
use crate::storage::SnapshotStore;
use crate::utils::errors::Result;

/// Dashboard queries scoped to the requesting user's clans.
#[derive(Debug, Clone)]
pub struct HomeworkService {
    store: Arc<SnapshotStore>,
    auth: AuthService,
}

impl HomeworkService {
    /// Create a new HomeworkService instance
    pub fn new(store: Arc<SnapshotStore>, auth: AuthService) -> Self {
        Self { store, auth }
    }

    /// Pending submissions visible to the user: their clans' submissions,
    /// or every pending submission for users without clans (administrators).
    pub async fn relevant_submissions(&self, username: Option<&str>) -> Result<Vec<Submission>> {
        if username.is_none() {
            return Ok(vec![]);
        }

        let clan_ids = self.auth.clans_for_user(username).await?;
        let homeworks = self.store.homeworks().await?;

        let relevant = if clan_ids.is_empty() {
            homeworks
                .iter()
                .filter(|submission| submission.is_pending_review())
                .cloned()
                .collect()
        } else {
            homeworks
                .iter()
                .filter(|submission| {
                    clan_ids.contains(&submission.clan_id) && submission.is_pending_review()
                })
                .cloned()
                .collect()
        };

        Ok(relevant)
    }

    /// Totals text and status text for the "homework info" dashboard.
    pub async fn overview(&self, username: Option<&str>) -> Result<(String, String)> {
        self.overview_at(username, Utc::now()).await
    }

    pub(crate) async fn overview_at(
        &self,
        username: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(String, String)> {
        let submissions = self.relevant_submissions(username).await?;

        if submissions.is_empty() {
            return Ok(("У вас нет домашних заданий на проверке.".to_string(), String::new()));
        }

        let mut by_clan: BTreeMap<i64, usize> = BTreeMap::new();
        for submission in &submissions {
            *by_clan.entry(submission.clan_id).or_insert(0) += 1;
        }

        let mut total_lines = vec!["📊 Домашние задания на проверке:".to_string()];
        for (clan_id, count) in &by_clan {
            total_lines.push(format!("Клан {}: {}", clan_id, count));
        }

        let overdue = submissions
            .iter()
            .filter(|submission| deadline::classify(submission, now) == Some(Phase::Overdue))
            .count();
        let in_time = submissions.len() - overdue;

        let status = format!(
            "Статус:\nПросрочено (>72ч): {}\nВ срок: {}",
            overdue, in_time
        );

        Ok((total_lines.join("\n"), status))
    }

    /// HTML text listing submissions expiring within 24 hours, closest
    /// deadline first.
    pub async fn expiring_text(&self, username: Option<&str>) -> Result<String> {
        self.expiring_text_at(username, Utc::now()).await
    }

    pub(crate) async fn expiring_text_at(
        &self,
        username: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let submissions = self.relevant_submissions(username).await?;

        let mut expiring: Vec<&Submission> = submissions
            .iter()
            .filter(|submission| deadline::classify(submission, now) == Some(Phase::ExpiringSoon))
            .collect();

        if expiring.is_empty() {
            return Ok(
                "На данный момент нет домашних заданий, которые истекают в ближайшие 24 часа."
                    .to_string(),
            );
        }

        expiring.sort_by(|a, b| {
            deadline::hours_left(a.delivery_date, now)
                .partial_cmp(&deadline::hours_left(b.delivery_date, now))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut lines = vec!["Домашние задания, истекающие в ближайшие 24 часа:".to_string()];
        for submission in expiring {
            let hours = deadline::hours_left(submission.delivery_date, now) as i64;
            lines.push(format!(
                "• {} — {} (клан {}, осталось ~{} ч)",
                html::escape(&submission.student_name()),
                html::escape(submission.task_label()),
                submission.clan_id,
                hours
            ));
        }

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AdminRecord, Clan, HomeworkInfo, Lesson, Mentor, Student, TaskType, STATUS_PENDING_REVIEW,
    };
    use chrono::Duration;
    use tempfile::TempDir;

    fn submission(id: i64, clan_id: i64, hours_ago: i64, status: &str, student: &str) -> Submission {
        Submission {
            id,
            clan_id,
            delivery_date: Utc::now() - Duration::hours(hours_ago),
            status: status.to_string(),
            user: Student {
                first_name: student.to_string(),
                last_name: None,
            },
            homework: HomeworkInfo {
                kind: TaskType {
                    name: "Практика".to_string(),
                },
                lesson: Some(Lesson {
                    topic: Some("Уравнения".to_string()),
                }),
            },
        }
    }

    fn mentor_with_clans(tag: &str, clan_ids: &[i64]) -> Mentor {
        Mentor {
            id: 1,
            first_name: None,
            last_name: None,
            full_name: "Наставник".to_string(),
            email: None,
            phone: None,
            telegram_id: Some(1),
            telegram_tag: Some(tag.to_string()),
            clans_mentor: clan_ids
                .iter()
                .map(|&id| Clan {
                    id,
                    name: None,
                    slogan: None,
                    target: None,
                    r#class: None,
                    max_students_count: None,
                })
                .collect(),
            courses: vec![],
        }
    }

    fn admin(tag: &str) -> AdminRecord {
        AdminRecord {
            id: 10,
            first_name: "Админ".to_string(),
            last_name: "Главный".to_string(),
            full_name: "Админ Главный".to_string(),
            email: None,
            phone: None,
            telegram_id: None,
            telegram_tag: Some(tag.to_string()),
            clans_mentor: vec![],
            courses: vec![],
        }
    }

    async fn service() -> (TempDir, HomeworkService) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(SnapshotStore::open(dir.path()).await.unwrap());
        store
            .replace_mentors(vec![mentor_with_clans("anna", &[1])])
            .await
            .unwrap();
        store.replace_admins(vec![admin("root")]).await.unwrap();
        store
            .replace_homeworks(vec![
                submission(1, 1, 73, STATUS_PENDING_REVIEW, "Иван"),
                submission(2, 1, 50, STATUS_PENDING_REVIEW, "Пётр"),
                submission(3, 2, 60, STATUS_PENDING_REVIEW, "Мария"),
                submission(4, 1, 1, "Проверено", "Олег"),
            ])
            .await
            .unwrap();
        let auth = AuthService::new(store.clone());
        (dir, HomeworkService::new(store, auth))
    }

    #[tokio::test]
    async fn test_mentor_sees_only_own_clans_pending() {
        let (_dir, service) = service().await;
        let subs = service.relevant_submissions(Some("anna")).await.unwrap();
        let ids: Vec<i64> = subs.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_admin_without_clans_sees_all_pending() {
        let (_dir, service) = service().await;
        let subs = service.relevant_submissions(Some("root")).await.unwrap();
        assert_eq!(subs.len(), 3);
    }

    #[tokio::test]
    async fn test_overview_counts() {
        let (_dir, service) = service().await;
        let (totals, status) = service.overview_at(Some("anna"), Utc::now()).await.unwrap();

        assert!(totals.contains("Клан 1: 2"));
        assert!(status.contains("Просрочено (>72ч): 1"));
        assert!(status.contains("В срок: 1"));
    }

    #[tokio::test]
    async fn test_overview_empty() {
        let (_dir, service) = service().await;
        let (totals, status) = service.overview_at(None, Utc::now()).await.unwrap();
        assert_eq!(totals, "У вас нет домашних заданий на проверке.");
        assert!(status.is_empty());
    }

    #[tokio::test]
    async fn test_expiring_sorted_closest_first() {
        let (_dir, service) = service().await;
        let text = service
            .expiring_text_at(Some("root"), Utc::now())
            .await
            .unwrap();

        // Мария has 12h left, Пётр 22h; closest deadline goes first
        let maria = text.find("Мария").unwrap();
        let pyotr = text.find("Пётр").unwrap();
        assert!(maria < pyotr);
        assert!(text.contains("осталось ~12 ч"));
    }

    #[tokio::test]
    async fn test_expiring_escapes_html() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(SnapshotStore::open(dir.path()).await.unwrap());
        store
            .replace_mentors(vec![mentor_with_clans("anna", &[1])])
            .await
            .unwrap();
        store
            .replace_homeworks(vec![submission(
                1,
                1,
                50,
                STATUS_PENDING_REVIEW,
                "<b>Иван</b>",
            )])
            .await
            .unwrap();
        let auth = AuthService::new(store.clone());
        let service = HomeworkService::new(store, auth);

        let text = service
            .expiring_text_at(Some("anna"), Utc::now())
            .await
            .unwrap();
        assert!(text.contains("&lt;b&gt;Иван&lt;/b&gt;"));
        assert!(!text.contains("<b>Иван</b>"));
    }
}
