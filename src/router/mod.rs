// src/router/mod.rs

pub mod admin;
pub mod callbacks;
pub mod commands;
pub mod donations;
pub mod messages;
pub mod music;

// Экспорт всех необходимых типов и функций
pub use self::callbacks::handle_callback;
pub use self::commands::handle_command;
pub use self::messages::handle_message;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use teloxide::types::ChatId;
use teloxide::utils::command::BotCommands;

use crate::models::{ArtistField, Genre};

/// Состояния диалогов. Каждый вариант несёт данные, собранные на
/// предыдущих шагах, поэтому отдельного «хранилища полей» нет.
#[derive(Debug, Clone)]
pub enum UserState {
    // Онбординг нового артиста (из /submit без профиля)
    OnboardName,
    OnboardPaymentLink {
        name: String,
    },
    OnboardGenre {
        name: String,
        payment_link: String,
    },
    OnboardBio {
        name: String,
        payment_link: String,
        default_genre: Genre,
    },

    // Загрузка трека
    SubmitAudio {
        artist_id: String,
        default_genre: Option<Genre>,
    },
    SubmitTitle {
        artist_id: String,
        default_genre: Option<Genre>,
        file_id: String,
    },
    SubmitGenre {
        artist_id: String,
        file_id: String,
        title: String,
    },
    SubmitCaption {
        artist_id: String,
        file_id: String,
        title: String,
        genre: Genre,
    },

    // Редактирование профиля
    ProfileEditValue {
        artist_id: String,
        field: ArtistField,
    },
    ProfileEditGenre {
        artist_id: String,
    },

    // Донаты
    DonationCustomAmount {
        track_id: String,
    },
    DonationNote {
        donation_id: String,
        card_message_id: i32,
    },

    None,
}

/// Тип для хранения состояний пользователей
pub type StateStorage = Arc<RwLock<HashMap<ChatId, UserState>>>;

pub fn get_state(storage: &StateStorage, chat_id: ChatId) -> UserState {
    storage
        .read()
        .expect("Failed to acquire read lock on state storage")
        .get(&chat_id)
        .cloned()
        .unwrap_or(UserState::None)
}

pub fn set_state(storage: &StateStorage, chat_id: ChatId, state: UserState) {
    storage
        .write()
        .expect("Failed to acquire write lock on state storage")
        .insert(chat_id, state);
}

/// Сбрасывает состояние; возвращает true, если диалог действительно шёл.
pub fn clear_state(storage: &StateStorage, chat_id: ChatId) -> bool {
    let mut guard = storage
        .write()
        .expect("Failed to acquire write lock on state storage");
    let had_dialog = !matches!(guard.get(&chat_id), Some(UserState::None) | Option::None);
    guard.insert(chat_id, UserState::None);
    had_dialog
}

/// Все доступные команды бота
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "start the bot / open a deep link")]
    Start(String),
    #[command(description = "show help", aliases = ["help", "?"])]
    Help,
    #[command(description = "submit a new track for review")]
    Submit,
    #[command(description = "view and edit your artist profile")]
    Profile,
    #[command(description = "change language")]
    Language,
    #[command(description = "cancel the current operation")]
    Cancel,
    #[command(description = "show the current chat id")]
    Chatid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_storage_roundtrip() {
        let storage: StateStorage = Arc::new(RwLock::new(HashMap::new()));
        let chat = ChatId(1);

        assert!(matches!(get_state(&storage, chat), UserState::None));
        assert!(!clear_state(&storage, chat));

        set_state(&storage, chat, UserState::OnboardName);
        assert!(matches!(get_state(&storage, chat), UserState::OnboardName));
        assert!(clear_state(&storage, chat));
        assert!(matches!(get_state(&storage, chat), UserState::None));
    }

    #[test]
    fn test_states_are_per_chat() {
        let storage: StateStorage = Arc::new(RwLock::new(HashMap::new()));
        set_state(&storage, ChatId(1), UserState::OnboardName);
        assert!(matches!(get_state(&storage, ChatId(2)), UserState::None));
    }
}
