//! Administrator model

use serde::{Deserialize, Serialize};

use super::mentor::{Clan, Course};

/// An administrator record from the admins snapshot.
///
/// Shares the mentor wire shape; records created locally carry empty clan
/// and course lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub telegram_id: Option<i64>,
    #[serde(default)]
    pub telegram_tag: Option<String>,
    #[serde(default)]
    pub clans_mentor: Vec<Clan>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// Request payload for creating a new administrator.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub first_name: String,
    pub last_name: String,
    pub telegram_tag: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl AdminRecord {
    /// Telegram tag without a leading `@`; `None` when absent or blank.
    pub fn normalized_tag(&self) -> Option<&str> {
        self.telegram_tag
            .as_deref()
            .map(|tag| tag.trim_start_matches('@'))
            .filter(|tag| !tag.is_empty())
    }

    /// Ids of the clans this administrator also mentors, if any.
    pub fn clan_ids(&self) -> Vec<i64> {
        self.clans_mentor.iter().map(|clan| clan.id).collect()
    }
}
