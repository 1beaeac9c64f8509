//! Mentor model

use serde::{Deserialize, Serialize};

/// A mentor as stored in the mentors snapshot.
///
/// `telegram_tag` is the authorization key (stored without a leading `@`),
/// `telegram_id` is the reminder delivery target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mentor {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
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

/// A clan (student group) a mentor is responsible for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clan {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slogan: Option<String>,
    #[serde(default)]
    pub target: Option<i64>,
    #[serde(default)]
    pub r#class: Option<i64>,
    #[serde(default)]
    pub max_students_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

impl Mentor {
    /// Telegram tag without a leading `@`; `None` when absent or blank.
    pub fn normalized_tag(&self) -> Option<&str> {
        self.telegram_tag
            .as_deref()
            .map(|tag| tag.trim_start_matches('@'))
            .filter(|tag| !tag.is_empty())
    }

    /// Ids of the clans this mentor owns.
    pub fn clan_ids(&self) -> Vec<i64> {
        self.clans_mentor.iter().map(|clan| clan.id).collect()
    }

    /// Whether this mentor is responsible for the given clan.
    pub fn mentors_clan(&self, clan_id: i64) -> bool {
        self.clans_mentor.iter().any(|clan| clan.id == clan_id)
    }

    /// Mentors without a telegram tag or without clans cannot authenticate
    /// and cannot be notified; sync drops them from the active snapshot.
    pub fn is_active(&self) -> bool {
        self.normalized_tag().is_some() && !self.clans_mentor.is_empty()
    }
}
