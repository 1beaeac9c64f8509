//! Maintenance gate middleware
//!
//! While a maintenance window is open, every inbound message is
//! short-circuited with the window's status message before it reaches
//! normal handling. A small allow-list of commands stays available so
//! users can still orient themselves.

use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::info;

use crate::services::maintenance::MaintenanceCoordinator;
use crate::utils::errors::Result;

/// Commands that stay available during maintenance.
pub const ALLOWED_COMMANDS: [&str; 2] = ["/start", "/help"];

/// Whether a message text may pass the gate while maintenance is active.
pub fn is_allowed_during_maintenance(text: &str) -> bool {
    ALLOWED_COMMANDS
        .iter()
        .any(|command| text.starts_with(command))
}

/// Whether the gate must intercept this message right now.
pub fn should_block(coordinator: &MaintenanceCoordinator, text: Option<&str>) -> bool {
    if !coordinator.is_active() {
        return false;
    }

    !text.map(is_allowed_during_maintenance).unwrap_or(false)
}

/// Reply with the maintenance message instead of handling the request.
pub async fn reject(
    bot: Bot,
    msg: Message,
    coordinator: std::sync::Arc<MaintenanceCoordinator>,
) -> Result<()> {
    bot.send_message(msg.chat.id, coordinator.user_message())
        .await?;

    let preview: String = msg.text().unwrap_or("").chars().take(50).collect();
    info!(
        user = msg.from.as_ref().and_then(|u| u.username.as_deref()),
        text = %preview,
        "Message blocked by maintenance mode"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::maintenance::SyncOperation;

    #[test]
    fn test_allow_list() {
        assert!(is_allowed_during_maintenance("/start"));
        assert!(is_allowed_during_maintenance("/help"));
        assert!(is_allowed_during_maintenance("/help@MentorBuddyBot"));
        assert!(!is_allowed_during_maintenance("Истекающие домашки"));
        assert!(!is_allowed_during_maintenance("/stats"));
    }

    #[test]
    fn test_gate_open_when_idle() {
        let coordinator = MaintenanceCoordinator::new();
        assert!(!should_block(&coordinator, Some("Истекающие домашки")));
        assert!(!should_block(&coordinator, None));
    }

    #[test]
    fn test_gate_blocks_everything_but_allow_list_when_active() {
        let coordinator = MaintenanceCoordinator::new();
        assert!(coordinator.start(SyncOperation::Mentors, 5, None));

        assert!(should_block(&coordinator, Some("Истекающие домашки")));
        assert!(should_block(&coordinator, Some("/stats")));
        // media messages carry no text and are blocked too
        assert!(should_block(&coordinator, None));

        assert!(!should_block(&coordinator, Some("/start")));
        assert!(!should_block(&coordinator, Some("/help")));
    }
}
