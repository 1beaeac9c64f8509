//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub sync: SyncConfig,
    pub notifier: NotifierConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
}

/// Mentoring platform API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub email: String,
    pub password: String,
    pub timeout_seconds: u64,
    pub per_page: u32,
}

/// Snapshot storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

/// Synchronization pacing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Base delay between page fetches, seconds
    pub page_delay_seconds: f64,
    /// Symmetric jitter applied to the base delay, seconds
    pub page_jitter_seconds: f64,
    /// Cooldown after a rate-limit response before retrying the same page
    pub rate_limit_cooldown_seconds: u64,
    /// How many rate-limit retries a single page fetch is allowed
    pub max_rate_limit_retries: u32,
    /// Advertised duration of a mentor base update, minutes
    pub mentors_estimate_minutes: u64,
    /// Advertised duration of a full homework base update, minutes
    pub homeworks_estimate_minutes: u64,
}

/// Reminder scheduler configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierConfig {
    /// Scan interval of the reminder task, seconds
    pub tick_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("MENTORBUDDY").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::MentorBuddyError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
            },
            api: ApiConfig {
                base_url: "https://api.example.com".to_string(),
                email: String::new(),
                password: String::new(),
                timeout_seconds: 30,
                per_page: 200,
            },
            storage: StorageConfig {
                data_dir: "data".to_string(),
            },
            sync: SyncConfig {
                page_delay_seconds: 4.5,
                page_jitter_seconds: 1.8,
                rate_limit_cooldown_seconds: 60,
                max_rate_limit_retries: 5,
                mentors_estimate_minutes: 5,
                homeworks_estimate_minutes: 30,
            },
            notifier: NotifierConfig { tick_seconds: 360 },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: "logs".to_string(),
            },
        }
    }
}
