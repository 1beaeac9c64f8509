//! /start command handler

use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::info;

use crate::handlers::{menus, sender_username};
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Handle /start: greet known users with their menu, turn strangers away.
pub async fn handle_start(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let username = sender_username(&msg);

    if !services.auth_service.is_authorized(username).await? {
        bot.send_message(
            msg.chat.id,
            "Доступ запрещён.\nВаш username не найден в списке наставников/админов.",
        )
        .await?;
        return Ok(());
    }

    let has_clans = !services.auth_service.clans_for_user(username).await?.is_empty();
    let is_admin = services.auth_service.is_admin(username).await?;

    info!(
        username = username,
        has_clans = has_clans,
        is_admin = is_admin,
        "User started the bot"
    );

    bot.send_message(
        msg.chat.id,
        "Добро пожаловать в помощник проверки ДЗ!\n\nДоступные команды:",
    )
    .reply_markup(menus::main_menu(has_clans, is_admin))
    .await?;

    Ok(())
}
