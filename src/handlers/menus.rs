//! Reply keyboard menus
//!
//! Button labels double as the routing keys in the message handler, so
//! they live here as constants.

use teloxide::types::{KeyboardButton, KeyboardMarkup};

pub const BTN_HOMEWORK_INFO: &str = "📚 Информация по домашкам";
pub const BTN_EXPIRING: &str = "Истекающие домашки";
pub const BTN_UPDATE_MY_HOMEWORKS: &str = "🔄 Обновить мои домашки";
pub const BTN_ADMIN_PANEL: &str = "🔧 Админ-панель";

pub const BTN_UPDATE_MENTORS: &str = "👤 Обновить базу наставников";
pub const BTN_UPDATE_ALL_HOMEWORKS: &str = "📚 Обновить базу домашек";
pub const BTN_BACK_TO_MAIN: &str = "◀️ Назад в главное меню";

/// Main menu; the update button appears only for mentors with clans and
/// the admin panel only for administrators.
pub fn main_menu(has_clans: bool, is_admin: bool) -> KeyboardMarkup {
    let mut rows = vec![
        vec![KeyboardButton::new(BTN_HOMEWORK_INFO)],
        vec![KeyboardButton::new(BTN_EXPIRING)],
    ];

    if has_clans {
        rows.push(vec![KeyboardButton::new(BTN_UPDATE_MY_HOMEWORKS)]);
    }

    if is_admin {
        rows.push(vec![KeyboardButton::new(BTN_ADMIN_PANEL)]);
    }

    resized(rows)
}

/// Administrator panel menu.
pub fn admin_menu() -> KeyboardMarkup {
    resized(vec![
        vec![KeyboardButton::new(BTN_UPDATE_MENTORS)],
        vec![KeyboardButton::new(BTN_UPDATE_ALL_HOMEWORKS)],
        vec![KeyboardButton::new(BTN_BACK_TO_MAIN)],
    ])
}

fn resized(rows: Vec<Vec<KeyboardButton>>) -> KeyboardMarkup {
    let mut keyboard = KeyboardMarkup::new(rows);
    keyboard.resize_keyboard = true;
    keyboard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_menu_rows_depend_on_role() {
        assert_eq!(main_menu(false, false).keyboard.len(), 2);
        assert_eq!(main_menu(true, false).keyboard.len(), 3);
        assert_eq!(main_menu(true, true).keyboard.len(), 4);
    }

    #[test]
    fn test_admin_menu_has_back_button() {
        let menu = admin_menu();
        let labels: Vec<&str> = menu
            .keyboard
            .iter()
            .flatten()
            .map(|button| button.text.as_str())
            .collect();
        assert!(labels.contains(&BTN_BACK_TO_MAIN));
    }
}
