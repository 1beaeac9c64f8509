//! Handlers module
//!
//! Command and message handlers for the bot, plus the shared authorization
//! checks they all start with.

pub mod commands;
pub mod menus;
pub mod messages;

use teloxide::prelude::*;
use teloxide::types::Message;

use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Telegram username of the message author, if any.
pub(crate) fn sender_username(msg: &Message) -> Option<&str> {
    msg.from.as_ref().and_then(|user| user.username.as_deref())
}

/// Telegram user id of the message author; 0 only for channel posts,
/// which the bot does not serve.
pub(crate) fn sender_id(msg: &Message) -> i64 {
    msg.from.as_ref().map(|user| user.id.0 as i64).unwrap_or(0)
}

/// Verify the sender is a known mentor or administrator; replies with a
/// denial otherwise.
pub(crate) async fn check_authorization(
    bot: &Bot,
    msg: &Message,
    services: &ServiceFactory,
) -> Result<bool> {
    let username = sender_username(msg);

    if services.auth_service.is_authorized(username).await? {
        Ok(true)
    } else {
        bot.send_message(msg.chat.id, "У вас нет доступа к этому боту.")
            .await?;
        Ok(false)
    }
}

/// Verify the sender is an administrator; replies with a denial otherwise.
pub(crate) async fn check_admin_rights(
    bot: &Bot,
    msg: &Message,
    services: &ServiceFactory,
) -> Result<bool> {
    let username = sender_username(msg);

    if services.auth_service.is_admin(username).await? {
        Ok(true)
    } else {
        bot.send_message(
            msg.chat.id,
            "❌ У вас нет прав администратора.\nЭта функция доступна только администраторам.",
        )
        .await?;
        Ok(false)
    }
}
