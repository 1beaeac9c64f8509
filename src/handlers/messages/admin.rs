//! Administrator panel handlers
//!
//! The two full-base updates run inside a maintenance window: while one is
//! open, the gate middleware blocks ordinary users, and a second update
//! attempt is rejected instead of queued. The window guard releases the
//! gate no matter how the sync ends.

use teloxide::prelude::*;
use teloxide::types::{ChatAction, Message};
use tracing::info;

use crate::handlers::{check_admin_rights, check_authorization, menus, sender_id, sender_username};
use crate::services::maintenance::{MaintenanceCoordinator, SyncOperation};
use crate::services::ServiceFactory;
use crate::state::BusyRegistry;
use crate::utils::errors::Result;

const MAINTENANCE_BUSY: &str = "⏳ Сейчас уже выполняется обновление базы.\n\
Пожалуйста, дождитесь завершения текущего обслуживания.";

const USER_BUSY: &str = "⏳ Обновление уже выполняется.\n\
Пожалуйста, дождитесь завершения предыдущего обновления.";

/// "Админ-панель": show the administrator menu.
pub async fn show_admin_panel(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    if !check_authorization(&bot, &msg, &services).await? {
        return Ok(());
    }
    if !check_admin_rights(&bot, &msg, &services).await? {
        return Ok(());
    }

    bot.send_message(msg.chat.id, "🔧 Админ-панель\n\nВыберите действие:")
        .reply_markup(menus::admin_menu())
        .await?;

    Ok(())
}

/// "Обновить базу наставников": full replacement of the mentor snapshot.
pub async fn update_mentors_base(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    coordinator: MaintenanceCoordinator,
    busy: BusyRegistry,
) -> Result<()> {
    if !check_authorization(&bot, &msg, &services).await? {
        return Ok(());
    }
    if !check_admin_rights(&bot, &msg, &services).await? {
        return Ok(());
    }

    let Some(_busy) = busy.acquire(sender_id(&msg)) else {
        bot.send_message(msg.chat.id, USER_BUSY).await?;
        return Ok(());
    };

    let estimate = services.sync_service.mentors_estimate_minutes();
    let Some(window) = coordinator.begin(SyncOperation::Mentors, estimate, None) else {
        bot.send_message(msg.chat.id, MAINTENANCE_BUSY).await?;
        return Ok(());
    };

    info!(admin = sender_username(&msg), "Mentor base update started");

    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;
    bot.send_message(
        msg.chat.id,
        "🔄 Начинаю обновление базы наставников...\n\n\
         ⏳ Это может занять продолжительное время (несколько минут).\n\
         Пожалуйста, ожидайте...",
    )
    .await?;

    let report = services.sync_service.sync_mentors().await;

    // release the gate before messaging, the bot is usable again
    drop(window);

    let summary = if report.success {
        format!(
            "✅ Обновление базы наставников завершено успешно!\n\n\
             📊 Статистика:\n\
             • Всего наставников загружено: {}\n\
             • Наставников с Telegram и кланами: {}\n\n\
             База данных наставников обновлена.",
            report.total_fetched, report.total_active
        )
    } else {
        format!(
            "❌ Ошибка при обновлении базы наставников:\n\n{}\n\n\
             Попробуйте повторить попытку позже или проверьте настройки API.",
            report.error.as_deref().unwrap_or("Неизвестная ошибка")
        )
    };

    bot.send_message(msg.chat.id, summary).await?;

    Ok(())
}

/// "Обновить базу домашек": refetch homework submissions for every clan
/// known to the mentor snapshot.
pub async fn update_all_homeworks(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    coordinator: MaintenanceCoordinator,
    busy: BusyRegistry,
) -> Result<()> {
    if !check_authorization(&bot, &msg, &services).await? {
        return Ok(());
    }
    if !check_admin_rights(&bot, &msg, &services).await? {
        return Ok(());
    }

    let Some(_busy) = busy.acquire(sender_id(&msg)) else {
        bot.send_message(msg.chat.id, USER_BUSY).await?;
        return Ok(());
    };

    let estimate = services.sync_service.homeworks_estimate_minutes();
    let Some(window) = coordinator.begin(SyncOperation::Homeworks, estimate, None) else {
        bot.send_message(msg.chat.id, MAINTENANCE_BUSY).await?;
        return Ok(());
    };

    info!(admin = sender_username(&msg), "Full homework base update started");

    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;
    bot.send_message(
        msg.chat.id,
        "🔄 Начинаю обновление базы домашних заданий...\n\n\
         ⏳ Это может занять очень продолжительное время (десятки минут).\n\
         Обновление загружает ДЗ по всем кланам из базы наставников.\n\n\
         Пожалуйста, ожидайте...",
    )
    .await?;

    let report = services.sync_service.sync_all_homeworks().await;

    drop(window);

    let summary = if report.success {
        format!(
            "✅ Обновление базы домашних заданий завершено успешно!\n\n\
             📊 Статистика:\n\
             • Обработано кланов: {}\n\
             • Загружено домашек (ожидают проверки): {}\n\n\
             База данных домашних заданий обновлена.",
            report.clans_updated, report.homeworks_fetched
        )
    } else {
        format!(
            "❌ Ошибка при обновлении базы домашек:\n\n{}\n\n\
             Попробуйте повторить попытку позже или проверьте настройки API.",
            report.error.as_deref().unwrap_or("Неизвестная ошибка")
        )
    };

    bot.send_message(msg.chat.id, summary).await?;

    Ok(())
}
