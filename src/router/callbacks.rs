// src/router/callbacks.rs

//! Диспетчеризация callback-запросов по префиксу данных между тремя
//! роутерами: admin, donations, music.

use teloxide::prelude::*;
use teloxide::types::CallbackQuery;

use super::StateStorage;
use crate::config::Config;
use crate::router::{admin, donations, music};
use crate::storage::Db;

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state_storage: StateStorage,
    cfg: Config,
    db: Db,
) -> anyhow::Result<()> {
    let Some(data) = q.data.clone() else {
        let _ = bot.answer_callback_query(q.id.clone()).await;
        return Ok(());
    };

    if data.starts_with("admin_approve:") || data.starts_with("admin_reject:") {
        admin::handle_callback(&bot, &q, &data, &cfg, &db).await
    } else if data.starts_with("don") || data.starts_with("support_track:") {
        donations::handle_callback(&bot, &q, &data, &state_storage, &cfg, &db).await
    } else {
        music::handle_callback(&bot, &q, &data, &state_storage, &db).await
    }
}
