//! Telegram messaging helpers
//!
//! Long dashboard texts can exceed Telegram's message size limit, so they
//! are split on line boundaries and sent as numbered parts.

use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};

use crate::utils::errors::Result;

/// Maximum characters per outgoing message, with headroom for part prefixes.
pub const MAX_MESSAGE_LENGTH: usize = 4090;

/// Split `text` into chunks of at most [`MAX_MESSAGE_LENGTH`] characters,
/// preferring line boundaries. Counts characters, not bytes, so Cyrillic
/// text never splits inside a code point.
pub fn split_message(text: &str) -> Vec<String> {
    if text.chars().count() <= MAX_MESSAGE_LENGTH {
        return vec![text.trim_end().to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if current_len > 0 && current_len + line_len > MAX_MESSAGE_LENGTH {
            parts.push(std::mem::take(&mut current).trim_end().to_string());
            current_len = 0;
        }

        if line_len > MAX_MESSAGE_LENGTH {
            // a single oversized line is hard-split on character boundaries
            for ch in line.chars() {
                if current_len >= MAX_MESSAGE_LENGTH {
                    parts.push(std::mem::take(&mut current).trim_end().to_string());
                    current_len = 0;
                }
                current.push(ch);
                current_len += 1;
            }
        } else {
            current.push_str(line);
            current_len += line_len;
        }
    }

    if !current.trim().is_empty() {
        parts.push(current.trim_end().to_string());
    }

    parts
}

/// Send `text` to `chat_id`, splitting into `Часть i/n` parts when it does
/// not fit into a single Telegram message. Rendered as HTML; interpolated
/// free-text fields must already be escaped.
pub async fn send_split_message(bot: &Bot, chat_id: ChatId, text: &str) -> Result<()> {
    let parts = split_message(text);
    let total = parts.len();

    for (index, part) in parts.into_iter().enumerate() {
        let body = if total > 1 {
            format!("Часть {}/{}\n\n{}", index + 1, total, part)
        } else {
            part
        };
        bot.send_message(chat_id, body)
            .parse_mode(ParseMode::Html)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_not_split() {
        let parts = split_message("короткое сообщение");
        assert_eq!(parts, vec!["короткое сообщение".to_string()]);
    }

    #[test]
    fn test_split_prefers_line_boundaries() {
        let line = "строка с домашкой и кланом\n";
        let text = line.repeat(400);
        let parts = split_message(&text);

        assert!(parts.len() > 1);
        for part in &parts {
            assert!(part.chars().count() <= MAX_MESSAGE_LENGTH);
            // every part ends with a complete line
            assert!(part.ends_with("кланом"));
        }
    }

    #[test]
    fn test_oversized_single_line_is_hard_split() {
        let text = "ю".repeat(MAX_MESSAGE_LENGTH * 2 + 10);
        let parts = split_message(&text);

        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.chars().count() <= MAX_MESSAGE_LENGTH));
        let total: usize = parts.iter().map(|p| p.chars().count()).sum();
        assert_eq!(total, MAX_MESSAGE_LENGTH * 2 + 10);
    }
}
