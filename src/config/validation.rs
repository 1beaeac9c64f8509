//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use url::Url;

use super::Settings;
use crate::services::notifier::REMINDER_WINDOW_HALF_WIDTH_HOURS;
use crate::utils::errors::{MentorBuddyError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_api_config(&settings.api)?;
    validate_storage_config(&settings.storage)?;
    validate_sync_config(&settings.sync)?;
    validate_notifier_config(&settings.notifier)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(MentorBuddyError::Config("Bot token is required".to_string()));
    }

    Ok(())
}

/// Validate platform API configuration
fn validate_api_config(config: &super::ApiConfig) -> Result<()> {
    if Url::parse(&config.base_url).is_err() {
        return Err(MentorBuddyError::Config(format!(
            "API base URL is not a valid URL: {}",
            config.base_url
        )));
    }

    if config.email.is_empty() || config.password.is_empty() {
        return Err(MentorBuddyError::Config(
            "API credentials (email and password) are required".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(MentorBuddyError::Config(
            "API timeout must be greater than 0".to_string(),
        ));
    }

    if config.per_page == 0 {
        return Err(MentorBuddyError::Config(
            "API page size must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.data_dir.is_empty() {
        return Err(MentorBuddyError::Config(
            "Storage data directory is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate synchronization configuration
fn validate_sync_config(config: &super::SyncConfig) -> Result<()> {
    if config.page_delay_seconds < 0.0 || config.page_jitter_seconds < 0.0 {
        return Err(MentorBuddyError::Config(
            "Sync delays cannot be negative".to_string(),
        ));
    }

    if config.max_rate_limit_retries == 0 {
        return Err(MentorBuddyError::Config(
            "At least one rate-limit retry must be allowed".to_string(),
        ));
    }

    Ok(())
}

/// Validate reminder scheduler configuration
fn validate_notifier_config(config: &super::NotifierConfig) -> Result<()> {
    if config.tick_seconds == 0 {
        return Err(MentorBuddyError::Config(
            "Notifier tick interval must be greater than 0".to_string(),
        ));
    }

    // Each reminder window is 2 * half-width hours wide. The scan interval
    // must stay strictly below that, otherwise a submission can cross a
    // whole window between two ticks and never be selected.
    let window_width_seconds = (2.0 * REMINDER_WINDOW_HALF_WIDTH_HOURS * 3600.0) as u64;
    if config.tick_seconds >= window_width_seconds {
        return Err(MentorBuddyError::Config(format!(
            "Notifier tick interval ({} s) must be below the reminder window width ({} s)",
            config.tick_seconds, window_width_seconds
        )));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(MentorBuddyError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(MentorBuddyError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    if config.directory.is_empty() {
        return Err(MentorBuddyError::Config(
            "Log directory is required".to_string(),
        ));
    }

    Ok(())
}
