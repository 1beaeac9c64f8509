//! Message handlers module
//!
//! Routes reply-keyboard button presses to the dashboard and update flows.
//! Free text outside a known button is ignored.

pub mod admin;

use teloxide::prelude::*;
use teloxide::types::{ChatAction, Message};
use tracing::debug;

use crate::handlers::{check_authorization, menus, sender_id, sender_username};
use crate::services::maintenance::MaintenanceCoordinator;
use crate::services::ServiceFactory;
use crate::state::BusyRegistry;
use crate::utils::errors::Result;
use crate::utils::telegram::send_split_message;

/// Handle incoming text messages by button label.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    coordinator: MaintenanceCoordinator,
    busy: BusyRegistry,
) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    match text {
        menus::BTN_HOMEWORK_INFO => show_homework_info(bot, msg, services).await,
        menus::BTN_EXPIRING => show_expiring(bot, msg, services).await,
        menus::BTN_UPDATE_MY_HOMEWORKS => update_my_homeworks(bot, msg, services, busy).await,
        menus::BTN_ADMIN_PANEL => admin::show_admin_panel(bot, msg, services).await,
        menus::BTN_UPDATE_MENTORS => {
            admin::update_mentors_base(bot, msg, services, coordinator, busy).await
        }
        menus::BTN_UPDATE_ALL_HOMEWORKS => {
            admin::update_all_homeworks(bot, msg, services, coordinator, busy).await
        }
        menus::BTN_BACK_TO_MAIN => back_to_main_menu(bot, msg, services).await,
        other => {
            let preview: String = other.chars().take(50).collect();
            debug!(
                user = sender_username(&msg),
                text = %preview,
                "Ignoring unrecognized message"
            );
            Ok(())
        }
    }
}

/// "Информация по домашкам": per-clan totals plus an overdue breakdown.
async fn show_homework_info(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !check_authorization(&bot, &msg, &services).await? {
        return Ok(());
    }

    let (totals, status) = services
        .homework_service
        .overview(sender_username(&msg))
        .await?;

    send_split_message(&bot, msg.chat.id, &totals).await?;

    if !status.is_empty() {
        bot.send_message(msg.chat.id, status).await?;
    }

    Ok(())
}

/// "Истекающие домашки": submissions with less than 24 hours left.
async fn show_expiring(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !check_authorization(&bot, &msg, &services).await? {
        return Ok(());
    }

    let text = services
        .homework_service
        .expiring_text(sender_username(&msg))
        .await?;

    send_split_message(&bot, msg.chat.id, &text).await?;

    Ok(())
}

/// "Обновить мои домашки": scoped sync over the mentor's own clans,
/// guarded per user so the same mentor cannot run two updates at once.
async fn update_my_homeworks(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    busy: BusyRegistry,
) -> Result<()> {
    if !check_authorization(&bot, &msg, &services).await? {
        return Ok(());
    }

    let clan_ids = services
        .auth_service
        .clans_for_user(sender_username(&msg))
        .await?;

    if clan_ids.is_empty() {
        bot.send_message(
            msg.chat.id,
            "❌ У вас нет привязанных кланов.\n\
             Эта функция доступна только наставникам с кланами.",
        )
        .await?;
        return Ok(());
    }

    let Some(_busy) = busy.acquire(sender_id(&msg)) else {
        bot.send_message(
            msg.chat.id,
            "⏳ Обновление уже выполняется.\n\
             Пожалуйста, дождитесь завершения предыдущего обновления.",
        )
        .await?;
        return Ok(());
    };

    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;
    bot.send_message(
        msg.chat.id,
        format!(
            "🔄 Начинаю обновление домашних заданий...\n\
             Кланов для обновления: {}\n\n\
             ⏳ Это может занять некоторое время, пожалуйста, ожидайте...",
            clan_ids.len()
        ),
    )
    .await?;

    let report = services.sync_service.sync_homeworks(&clan_ids).await;

    let summary = if report.success {
        format!(
            "✅ Обновление завершено успешно!\n\n\
             📊 Статистика:\n\
             • Обновлено кланов: {}\n\
             • Загружено домашек: {}\n\n\
             Данные обновлены и доступны в других разделах бота.",
            report.clans_updated, report.homeworks_fetched
        )
    } else {
        format!(
            "❌ Ошибка при обновлении:\n\n{}\n\n\
             Попробуйте повторить попытку позже или обратитесь к администратору.",
            report.error.as_deref().unwrap_or("Неизвестная ошибка")
        )
    };

    bot.send_message(msg.chat.id, summary).await?;

    Ok(())
}

/// "Назад в главное меню".
async fn back_to_main_menu(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let username = sender_username(&msg);
    let has_clans = !services.auth_service.clans_for_user(username).await?.is_empty();
    let is_admin = services.auth_service.is_admin(username).await?;

    bot.send_message(msg.chat.id, "Главное меню")
        .reply_markup(menus::main_menu(has_clans, is_admin))
        .await?;

    Ok(())
}
