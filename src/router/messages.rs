// src/router/messages.rs

//! Диспетчеризация обычных сообщений по текущему состоянию диалога.
//! Сообщения без активного диалога и «проскочившие» команды игнорируются.

use teloxide::prelude::*;

use super::{StateStorage, UserState, get_state};
use crate::config::Config;
use crate::router::{donations, music};
use crate::storage::Db;

pub async fn handle_message(
    bot: Bot,
    msg: Message,
    state_storage: StateStorage,
    cfg: Config,
    db: Db,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    let state = get_state(&state_storage, chat_id);
    if matches!(state, UserState::None) {
        return Ok(());
    }

    // Команды не должны попадать в обработчики состояний
    if msg.text().map(|t| t.starts_with('/')).unwrap_or(false) {
        return Ok(());
    }

    match state {
        UserState::DonationCustomAmount { .. } | UserState::DonationNote { .. } => {
            donations::handle_state_message(&bot, &msg, state, &state_storage, &db).await
        }
        UserState::None => Ok(()),
        _ => music::handle_state_message(&bot, &msg, state, &state_storage, &cfg, &db).await,
    }
}
