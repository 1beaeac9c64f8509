//! Authorization and mentor lookup service
//!
//! Authorization is keyed by telegram username: a user is known when their
//! normalized tag matches a mentor or admin record in the snapshots.

use std::sync::Arc;

use teloxide::types::ChatId;
use tracing::debug;

use crate::storage::SnapshotStore;
use crate::utils::errors::Result;

/// Handle-based authorization over the mentor and admin snapshots.
#[derive(Debug, Clone)]
pub struct AuthService {
    store: Arc<SnapshotStore>,
}

/// Strip the leading `@` Telegram clients like to prepend.
fn normalize(handle: &str) -> &str {
    handle.trim_start_matches('@')
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    /// Whether the handle belongs to a known mentor or administrator.
    pub async fn is_authorized(&self, username: Option<&str>) -> Result<bool> {
        let Some(username) = username else {
            return Ok(false);
        };
        let username = normalize(username);

        let mentors = self.store.mentors().await?;
        if mentors
            .iter()
            .any(|mentor| mentor.normalized_tag() == Some(username))
        {
            return Ok(true);
        }

        let admins = self.store.admins().await?;
        Ok(admins
            .iter()
            .any(|admin| admin.normalized_tag() == Some(username)))
    }

    /// Whether the handle belongs to an administrator.
    pub async fn is_admin(&self, username: Option<&str>) -> Result<bool> {
        let Some(username) = username else {
            return Ok(false);
        };
        let username = normalize(username);

        let admins = self.store.admins().await?;
        Ok(admins
            .iter()
            .any(|admin| admin.normalized_tag() == Some(username)))
    }

    /// Ids of the clans the user is responsible for. Mentor records are
    /// checked first, then admin records.
    pub async fn clans_for_user(&self, username: Option<&str>) -> Result<Vec<i64>> {
        let Some(username) = username else {
            return Ok(vec![]);
        };
        let username = normalize(username);

        let mentors = self.store.mentors().await?;
        if let Some(mentor) = mentors
            .iter()
            .find(|mentor| mentor.normalized_tag() == Some(username))
        {
            return Ok(mentor.clan_ids());
        }

        let admins = self.store.admins().await?;
        if let Some(admin) = admins
            .iter()
            .find(|admin| admin.normalized_tag() == Some(username))
        {
            return Ok(admin.clan_ids());
        }

        Ok(vec![])
    }

    /// Chat ids of every mentor responsible for the clan that can actually
    /// be reached (has a telegram id).
    pub async fn mentor_chat_ids_for_clan(&self, clan_id: i64) -> Result<Vec<ChatId>> {
        let mentors = self.store.mentors().await?;

        let chat_ids: Vec<ChatId> = mentors
            .iter()
            .filter(|mentor| mentor.mentors_clan(clan_id))
            .filter_map(|mentor| mentor.telegram_id)
            .map(ChatId)
            .collect();

        debug!(
            clan_id = clan_id,
            recipients = chat_ids.len(),
            "Resolved mentors for clan"
        );
        Ok(chat_ids)
    }
}
