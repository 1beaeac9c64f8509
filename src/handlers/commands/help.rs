//! /help command handler

use teloxide::prelude::*;
use teloxide::types::Message;

use crate::utils::errors::Result;

const HELP_TEXT: &str = "Помощник проверки ДЗ.\n\n\
Кнопки главного меню:\n\
• 📚 Информация по домашкам — сводка по домашкам на проверке\n\
• Истекающие домашки — задания, у которых дедлайн ближе 24 часов\n\
• 🔄 Обновить мои домашки — подтянуть домашки ваших кланов с платформы\n\n\
Команды:\n\
/start — главное меню\n\
/help — эта справка\n\n\
Напоминания о дедлайнах приходят автоматически за ~24 и ~12 часов.";

/// Handle /help. Always available, including during maintenance.
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, HELP_TEXT).await?;
    Ok(())
}
