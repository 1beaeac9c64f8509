//! Snapshot synchronization module
//!
//! Coordinates pagination against the platform API and the replacement of
//! snapshot collections: full replacement for mentors, partial replacement
//! by clan scope for homework submissions. Fetching always completes before
//! anything is written, so a failed run leaves the previous snapshot
//! intact.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{error, info, warn};

use crate::api::PlatformClient;
use crate::config::{ApiConfig, SyncConfig};
use crate::models::{Mentor, Submission};
use crate::storage::SnapshotStore;
use crate::utils::errors::{ApiError, ApiResult, Result};

/// Outcome of a mentor base synchronization.
#[derive(Debug, Clone)]
pub struct MentorSyncReport {
    pub success: bool,
    /// Unique mentors fetched from the platform.
    pub total_fetched: usize,
    /// Mentors kept in the snapshot (with a telegram tag and clans).
    pub total_active: usize,
    pub error: Option<String>,
}

/// Outcome of a homework synchronization for a clan scope.
#[derive(Debug, Clone)]
pub struct HomeworkSyncReport {
    pub success: bool,
    pub clans_updated: usize,
    pub homeworks_fetched: usize,
    pub error: Option<String>,
}

/// Orchestrates paginated fetching and snapshot replacement.
#[derive(Debug, Clone)]
pub struct SyncService {
    client: PlatformClient,
    store: Arc<SnapshotStore>,
    api: ApiConfig,
    config: SyncConfig,
}

impl SyncService {
    /// Create a new SyncService instance
    pub fn new(
        client: PlatformClient,
        store: Arc<SnapshotStore>,
        api: ApiConfig,
        config: SyncConfig,
    ) -> Self {
        Self {
            client,
            store,
            api,
            config,
        }
    }

    /// Replace the whole mentor snapshot with freshly fetched records.
    pub async fn sync_mentors(&self) -> MentorSyncReport {
        info!("Starting mentor base synchronization");

        match self.run_mentor_sync().await {
            Ok((total_fetched, total_active)) => {
                info!(
                    total_fetched = total_fetched,
                    total_active = total_active,
                    "Mentor base synchronized"
                );
                MentorSyncReport {
                    success: true,
                    total_fetched,
                    total_active,
                    error: None,
                }
            }
            Err(e) => {
                error!(error = %e, "Mentor base synchronization failed");
                MentorSyncReport {
                    success: false,
                    total_fetched: 0,
                    total_active: 0,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Replace the homework snapshot rows belonging to `clan_ids`; rows of
    /// other clans are preserved verbatim.
    pub async fn sync_homeworks(&self, clan_ids: &[i64]) -> HomeworkSyncReport {
        if clan_ids.is_empty() {
            return HomeworkSyncReport {
                success: false,
                clans_updated: 0,
                homeworks_fetched: 0,
                error: Some("Нет кланов для обновления".to_string()),
            };
        }

        info!(clans = clan_ids.len(), "Starting homework synchronization");

        match self.run_homework_sync(clan_ids).await {
            Ok(homeworks_fetched) => {
                info!(
                    clans = clan_ids.len(),
                    homeworks_fetched = homeworks_fetched,
                    "Homework snapshot synchronized"
                );
                HomeworkSyncReport {
                    success: true,
                    clans_updated: clan_ids.len(),
                    homeworks_fetched,
                    error: None,
                }
            }
            Err(e) => {
                error!(error = %e, "Homework synchronization failed");
                HomeworkSyncReport {
                    success: false,
                    clans_updated: 0,
                    homeworks_fetched: 0,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Synchronize homeworks for every clan known to the mentor snapshot.
    pub async fn sync_all_homeworks(&self) -> HomeworkSyncReport {
        let mentors = match self.store.mentors().await {
            Ok(mentors) => mentors,
            Err(e) => {
                error!(error = %e, "Cannot read mentor snapshot for a full homework sync");
                return HomeworkSyncReport {
                    success: false,
                    clans_updated: 0,
                    homeworks_fetched: 0,
                    error: Some(e.to_string()),
                };
            }
        };

        let mut clan_ids: Vec<i64> = mentors
            .iter()
            .flat_map(|mentor| mentor.clan_ids())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        clan_ids.sort_unstable();

        self.sync_homeworks(&clan_ids).await
    }

    async fn run_mentor_sync(&self) -> Result<(usize, usize)> {
        let token = self
            .client
            .login(&self.api.email, &self.api.password)
            .await?;

        let mut mentors: Vec<Mentor> = Vec::new();
        let mut seen: HashMap<i64, usize> = HashMap::new();
        let mut page = 1u32;

        loop {
            let (items, meta) = self
                .with_rate_limit_retry(|| self.client.mentors_page(&token, page, self.api.per_page))
                .await?;

            if items.is_empty() {
                break;
            }

            for item in items {
                let mentor = item.into_mentor();
                upsert_by_id(&mut mentors, &mut seen, mentor.id, mentor);
            }

            let last_page = meta.last_page.unwrap_or(page);
            if page >= last_page {
                break;
            }

            page += 1;
            tokio::time::sleep(self.page_delay()).await;
        }

        let total_fetched = mentors.len();
        warn_on_duplicate_tags(&mentors);

        let active: Vec<Mentor> = mentors.into_iter().filter(Mentor::is_active).collect();
        let total_active = self.store.replace_mentors(active).await?;

        Ok((total_fetched, total_active))
    }

    async fn run_homework_sync(&self, clan_ids: &[i64]) -> Result<usize> {
        let token = self
            .client
            .login(&self.api.email, &self.api.password)
            .await?;

        let mut fresh: Vec<Submission> = Vec::new();
        let mut seen: HashMap<i64, usize> = HashMap::new();

        for &clan_id in clan_ids {
            let mut page = 1u32;

            loop {
                let (items, meta) = self
                    .with_rate_limit_retry(|| {
                        self.client.clan_homeworks_page(&token, clan_id, page)
                    })
                    .await?;

                // an empty page ends the clan even if last_page was not reached
                if items.is_empty() {
                    break;
                }

                for item in items {
                    let submission = item.into_submission(clan_id);
                    upsert_by_id(&mut fresh, &mut seen, submission.id, submission);
                }

                let last_page = meta.last_page.unwrap_or(1);
                if page >= last_page {
                    break;
                }

                page += 1;
                tokio::time::sleep(self.page_delay()).await;
            }
        }

        let homeworks_fetched = fresh.len();

        // fetching is done; only now touch the snapshot
        let scope: HashSet<i64> = clan_ids.iter().copied().collect();
        let existing = self.store.homeworks().await?;
        let mut merged: Vec<Submission> = existing
            .iter()
            .filter(|submission| !scope.contains(&submission.clan_id))
            .cloned()
            .collect();
        merged.extend(fresh);

        self.store.replace_homeworks(merged).await?;

        Ok(homeworks_fetched)
    }

    /// Run one page fetch, cooling down and retrying the same page a bounded
    /// number of times when the platform answers with a rate limit.
    async fn with_rate_limit_retry<T, F, Fut>(&self, mut fetch: F) -> ApiResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = ApiResult<T>>,
    {
        let mut attempts = 0u32;

        loop {
            match fetch().await {
                Err(ApiError::RateLimited) if attempts < self.config.max_rate_limit_retries => {
                    attempts += 1;
                    warn!(
                        attempt = attempts,
                        cooldown_seconds = self.config.rate_limit_cooldown_seconds,
                        "Rate limited by the platform, cooling down"
                    );
                    tokio::time::sleep(Duration::from_secs(self.config.rate_limit_cooldown_seconds))
                        .await;
                }
                other => return other,
            }
        }
    }

    fn page_delay(&self) -> Duration {
        page_delay(&self.config)
    }

    /// Advertised duration of a mentor base update, minutes.
    pub fn mentors_estimate_minutes(&self) -> u64 {
        self.config.mentors_estimate_minutes
    }

    /// Advertised duration of a full homework base update, minutes.
    pub fn homeworks_estimate_minutes(&self) -> u64 {
        self.config.homeworks_estimate_minutes
    }
}

/// Randomized pause between page fetches: base plus symmetric jitter,
/// never below one second.
fn page_delay(config: &SyncConfig) -> Duration {
    let jitter = config.page_jitter_seconds;
    let offset = if jitter > 0.0 {
        rand::thread_rng().gen_range(-jitter..=jitter)
    } else {
        0.0
    };
    let seconds = (config.page_delay_seconds + offset).max(1.0);
    Duration::from_secs_f64(seconds)
}

/// Insert keeping first-seen order; a repeated id within the same run
/// overwrites the earlier record (last write wins).
fn upsert_by_id<T>(items: &mut Vec<T>, seen: &mut HashMap<i64, usize>, id: i64, item: T) {
    match seen.get(&id) {
        Some(&position) => items[position] = item,
        None => {
            seen.insert(id, items.len());
            items.push(item);
        }
    }
}

fn warn_on_duplicate_tags(mentors: &[Mentor]) {
    let mut tags: HashSet<&str> = HashSet::new();
    for mentor in mentors {
        if let Some(tag) = mentor.normalized_tag() {
            if !tags.insert(tag) {
                warn!(tag = tag, "Duplicate telegram tag across mentor records");
            }
        }
    }
}
