// src/router/commands.rs

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::info;

use super::{Command, StateStorage, clear_state};
use crate::i18n::{Phrase, t};
use crate::keyboards::kb_lang;
use crate::router::{donations, music};
use crate::storage::{self, Db};

// Основной обработчик команд
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state_storage: StateStorage,
    db: Db,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    let Some(user) = msg.from.clone() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let lang = storage::get_lang(&db, user_id).await?;

    match cmd {
        Command::Start(payload) => {
            let payload = payload.trim();
            if let Some(track_id) = payload.strip_prefix("donate_") {
                // Deep link с поста в канале: сразу диалог доната
                info!("Deep link donate for track {} from chat {}", track_id, chat_id);
                donations::start_donation_dialog(&bot, chat_id, track_id, &db, lang).await?;
            } else if let Some(artist_id) = payload.strip_prefix("artist_") {
                info!("Deep link artist profile {} from chat {}", artist_id, chat_id);
                music::show_public_profile(&bot, chat_id, artist_id, &db, lang).await?;
            } else if storage::get_artist_by_tg(&db, user_id).await?.is_some() {
                bot.send_message(chat_id, t(lang, Phrase::WelcomeBack))
                    .parse_mode(ParseMode::Html)
                    .await?;
            } else {
                bot.send_message(chat_id, t(lang, Phrase::WelcomeNew))
                    .parse_mode(ParseMode::Html)
                    .reply_markup(kb_lang())
                    .await?;
            }
        }
        Command::Help => {
            bot.send_message(chat_id, t(lang, Phrase::HelpText))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Command::Submit => {
            music::start_submit(&bot, chat_id, user_id, &state_storage, &db, lang).await?;
        }
        Command::Profile => {
            music::show_own_profile(&bot, chat_id, user_id, &db, lang).await?;
        }
        Command::Language => {
            bot.send_message(chat_id, t(lang, Phrase::SelectLanguage))
                .reply_markup(kb_lang())
                .await?;
        }
        Command::Cancel => {
            let had_dialog = clear_state(&state_storage, chat_id);
            let text = if had_dialog {
                t(lang, Phrase::Cancelled)
            } else {
                t(lang, Phrase::NothingToCancel)
            };
            bot.send_message(chat_id, text).await?;
        }
        Command::Chatid => {
            // Удобно при настройке каналов и групп обсуждений
            bot.send_message(chat_id, format!("Chat ID: <code>{}</code>", chat_id))
                .parse_mode(ParseMode::Html)
                .await?;
        }
    }
    Ok(())
}
