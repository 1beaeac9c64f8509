//! /newadmin command handler

use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::info;

use crate::handlers::{check_admin_rights, check_authorization, sender_username};
use crate::models::NewAdmin;
use crate::services::ServiceFactory;
use crate::utils::errors::{MentorBuddyError, Result};

const USAGE: &str = "Использование:\n\
/newadmin Имя Фамилия @username [email] [телефон]";

/// Parse the argument line of /newadmin.
fn parse_new_admin(args: &str) -> Option<NewAdmin> {
    let mut parts = args.split_whitespace();

    let first_name = parts.next()?.to_string();
    let last_name = parts.next()?.to_string();
    let telegram_tag = parts.next()?.to_string();
    let email = parts.next().map(str::to_string);
    let phone = parts.next().map(str::to_string);

    Some(NewAdmin {
        first_name,
        last_name,
        telegram_tag,
        email,
        phone,
    })
}

/// Handle /newadmin: create an administrator record from one message.
pub async fn handle_new_admin(
    bot: Bot,
    msg: Message,
    args: String,
    services: ServiceFactory,
) -> Result<()> {
    if !check_authorization(&bot, &msg, &services).await? {
        return Ok(());
    }
    if !check_admin_rights(&bot, &msg, &services).await? {
        return Ok(());
    }

    let Some(request) = parse_new_admin(&args) else {
        bot.send_message(msg.chat.id, USAGE).await?;
        return Ok(());
    };

    match services.admin_service.create_admin(request).await {
        Ok(admin) => {
            info!(
                created_by = sender_username(&msg),
                admin_id = admin.id,
                "Administrator created via command"
            );
            bot.send_message(
                msg.chat.id,
                format!(
                    "✅ Администратор успешно создан!\n\n\
                     👤 {}\n\
                     📱 @{}\n\
                     🆔 ID: {}",
                    admin.full_name,
                    admin.telegram_tag.as_deref().unwrap_or("-"),
                    admin.id
                ),
            )
            .await?;
        }
        Err(MentorBuddyError::InvalidInput(reason)) => {
            bot.send_message(
                msg.chat.id,
                format!("❌ Ошибка при создании администратора:\n\n{}", reason),
            )
            .await?;
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
