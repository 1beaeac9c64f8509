//! Sync orchestrator integration tests
//!
//! Run the real `SyncService` against a mocked platform API and a
//! temporary snapshot directory.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use MentorBuddy::api::PlatformClient;
use MentorBuddy::config::{ApiConfig, SyncConfig};
use MentorBuddy::models::{HomeworkInfo, Student, Submission, TaskType, STATUS_PENDING_REVIEW};
use MentorBuddy::storage::SnapshotStore;
use MentorBuddy::sync::SyncService;

fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        email: "bot@example.com".to_string(),
        password: "secret".to_string(),
        timeout_seconds: 5,
        per_page: 2,
    }
}

fn fast_sync_config() -> SyncConfig {
    SyncConfig {
        page_delay_seconds: 0.0,
        page_jitter_seconds: 0.0,
        rate_limit_cooldown_seconds: 0,
        max_rate_limit_retries: 2,
        mentors_estimate_minutes: 5,
        homeworks_estimate_minutes: 30,
    }
}

async fn service(server: &MockServer) -> (TempDir, Arc<SnapshotStore>, SyncService) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SnapshotStore::open(dir.path()).await.unwrap());
    let api = api_config(&server.uri());
    let client = PlatformClient::new(&api).unwrap();
    let sync = SyncService::new(client, store.clone(), api, fast_sync_config());
    (dir, store, sync)
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "tok-1"})),
        )
        .mount(server)
        .await;
}

fn api_mentor(id: i64, tag: Option<&str>, clan_ids: &[i64], first_name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "first_name": first_name,
        "last_name": "Тестовая",
        "telegram_tag": tag,
        "telegram_id": 1000 + id,
        "clansMentor": clan_ids
            .iter()
            .map(|clan_id| serde_json::json!({"id": clan_id, "name": format!("Клан {clan_id}")}))
            .collect::<Vec<_>>(),
        "courses": []
    })
}

fn api_submission(id: i64, hours_ago: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "delivery_date": (Utc::now() - Duration::hours(hours_ago)).to_rfc3339(),
        "status": STATUS_PENDING_REVIEW,
        "user": {"first_name": "Иван", "last_name": "Сидоров"},
        "homework": {"type": {"name": "Практика"}, "lesson": {"topic": "Уравнения"}}
    })
}

fn local_submission(id: i64, clan_id: i64) -> Submission {
    Submission {
        id,
        clan_id,
        delivery_date: Utc::now() - Duration::hours(10),
        status: STATUS_PENDING_REVIEW.to_string(),
        user: Student {
            first_name: "Мария".to_string(),
            last_name: None,
        },
        homework: HomeworkInfo {
            kind: TaskType {
                name: "Теория".to_string(),
            },
            lesson: None,
        },
    }
}

#[tokio::test]
async fn test_mentor_sync_dedups_filters_and_replaces() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/mentors"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                api_mentor(1, Some("@anna"), &[3], "Анна"),
                api_mentor(2, None, &[], "Без тега"),
                api_mentor(3, Some("clanless"), &[], "Без кланов"),
            ],
            "meta": {"last_page": 2, "total": 4}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/mentors"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                api_mentor(1, Some("@anna"), &[3, 4], "Анна-обновлённая"),
                api_mentor(4, Some("boris"), &[5], "Борис"),
            ],
            "meta": {"last_page": 2, "total": 4}
        })))
        .mount(&server)
        .await;

    let (_dir, store, sync) = service(&server).await;
    let report = sync.sync_mentors().await;

    assert!(report.success, "sync failed: {:?}", report.error);
    assert_eq!(report.total_fetched, 4);
    assert_eq!(report.total_active, 2);

    let mentors = store.mentors().await.unwrap();
    let ids: Vec<i64> = mentors.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 4]);

    // the page-2 record for mentor 1 won
    assert_eq!(mentors[0].first_name.as_deref(), Some("Анна-обновлённая"));
    assert_eq!(mentors[0].clan_ids(), vec![3, 4]);
}

#[tokio::test]
async fn test_homework_sync_partial_replacement_preserves_other_clans() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/clan/2/homeworks"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": (100..105).map(|id| api_submission(id, 5)).collect::<Vec<_>>(),
            "meta": {"last_page": 1, "total": 5}
        })))
        .mount(&server)
        .await;

    let (_dir, store, sync) = service(&server).await;
    store
        .replace_homeworks(vec![
            local_submission(1, 1),
            local_submission(2, 2),
            local_submission(3, 2),
            local_submission(4, 3),
        ])
        .await
        .unwrap();

    let report = sync.sync_homeworks(&[2]).await;

    assert!(report.success, "sync failed: {:?}", report.error);
    assert_eq!(report.clans_updated, 1);
    assert_eq!(report.homeworks_fetched, 5);

    let homeworks = store.homeworks().await.unwrap();
    assert_eq!(homeworks.len(), 6);

    // clans 1 and 3 kept their rows, old clan-2 rows are gone
    let clan1: Vec<i64> = homeworks.iter().filter(|h| h.clan_id == 1).map(|h| h.id).collect();
    let clan2: Vec<i64> = homeworks.iter().filter(|h| h.clan_id == 2).map(|h| h.id).collect();
    let clan3: Vec<i64> = homeworks.iter().filter(|h| h.clan_id == 3).map(|h| h.id).collect();
    assert_eq!(clan1, vec![1]);
    assert_eq!(clan2, vec![100, 101, 102, 103, 104]);
    assert_eq!(clan3, vec![4]);
}

#[tokio::test]
async fn test_empty_page_terminates_pagination_before_last_page() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/clan/5/homeworks"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [],
            "meta": {"last_page": 3, "total": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    // page 2 must never be requested
    Mock::given(method("GET"))
        .and(path("/clan/5/homeworks"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [api_submission(900, 5)],
            "meta": {"last_page": 3}
        })))
        .expect(0)
        .mount(&server)
        .await;

    let (_dir, store, sync) = service(&server).await;
    let report = sync.sync_homeworks(&[5]).await;

    assert!(report.success);
    assert_eq!(report.homeworks_fetched, 0);
    assert!(store.homeworks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rate_limited_page_is_retried_after_cooldown() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    // first answer is a rate limit, the retry of the same page succeeds
    Mock::given(method("GET"))
        .and(path("/mentors"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/mentors"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [api_mentor(1, Some("anna"), &[3], "Анна")],
            "meta": {"last_page": 1, "total": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, store, sync) = service(&server).await;
    let report = sync.sync_mentors().await;

    assert!(report.success, "sync failed: {:?}", report.error);
    assert_eq!(report.total_active, 1);
    assert_eq!(store.mentors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_failure_leaves_previous_snapshot_intact() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (dir, store, sync) = service(&server).await;
    store
        .replace_homeworks(vec![local_submission(1, 1)])
        .await
        .unwrap();
    let file_before = std::fs::read(dir.path().join("homeworks.json")).unwrap();

    let report = sync.sync_homeworks(&[1]).await;

    assert!(!report.success);
    assert!(report.error.unwrap().contains("authentication"));

    let file_after = std::fs::read(dir.path().join("homeworks.json")).unwrap();
    assert_eq!(file_before, file_after);
    assert_eq!(store.homeworks().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_fetch_failure_mid_run_writes_nothing() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/clan/2/homeworks"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (_dir, store, sync) = service(&server).await;
    store
        .replace_homeworks(vec![local_submission(1, 2), local_submission(2, 3)])
        .await
        .unwrap();

    let report = sync.sync_homeworks(&[2]).await;

    assert!(!report.success);

    // the stale clan-2 row survives because nothing was written
    let homeworks = store.homeworks().await.unwrap();
    assert_eq!(homeworks.len(), 2);
    assert!(homeworks.iter().any(|h| h.id == 1 && h.clan_id == 2));
}
