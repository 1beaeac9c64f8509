//! Administrator management service

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::models::{AdminRecord, NewAdmin};
use crate::storage::SnapshotStore;
use crate::utils::errors::{MentorBuddyError, Result};

/// Creates administrator records in the admins snapshot.
#[derive(Debug, Clone)]
pub struct AdminService {
    store: Arc<SnapshotStore>,
}

impl AdminService {
    /// Create a new AdminService instance
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    /// Create a new administrator. Rejects blank required fields and
    /// duplicate telegram tags; the id is the creation timestamp in
    /// milliseconds.
    pub async fn create_admin(&self, request: NewAdmin) -> Result<AdminRecord> {
        let first_name = request.first_name.trim().to_string();
        let last_name = request.last_name.trim().to_string();
        let telegram_tag = request.telegram_tag.trim().trim_start_matches('@').to_string();

        if first_name.is_empty() || last_name.is_empty() {
            return Err(MentorBuddyError::InvalidInput(
                "имя и фамилия обязательны".to_string(),
            ));
        }

        if telegram_tag.is_empty() {
            return Err(MentorBuddyError::InvalidInput(
                "telegram username не может быть пустым".to_string(),
            ));
        }

        if !telegram_tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(MentorBuddyError::InvalidInput(format!(
                "недопустимый telegram username: @{}",
                telegram_tag
            )));
        }

        let admins = self.store.admins().await?;
        if admins
            .iter()
            .any(|admin| admin.normalized_tag() == Some(telegram_tag.as_str()))
        {
            return Err(MentorBuddyError::InvalidInput(format!(
                "администратор с telegram username '@{}' уже существует",
                telegram_tag
            )));
        }

        let record = AdminRecord {
            id: Utc::now().timestamp_millis(),
            full_name: format!("{} {}", first_name, last_name),
            first_name,
            last_name,
            email: request.email.filter(|email| !email.trim().is_empty()),
            phone: request.phone.filter(|phone| !phone.trim().is_empty()),
            telegram_id: None,
            telegram_tag: Some(telegram_tag),
            clans_mentor: vec![],
            courses: vec![],
        };

        let mut updated: Vec<AdminRecord> = admins.iter().cloned().collect();
        updated.push(record.clone());
        self.store.replace_admins(updated).await?;

        info!(
            admin_id = record.id,
            tag = record.telegram_tag.as_deref(),
            "Administrator created"
        );

        Ok(record)
    }
}
