// src/telegram.rs

use crate::config::Config;
use crate::router::{Command, StateStorage, handle_callback, handle_command, handle_message};
use crate::storage::Db;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use teloxide::{
    dptree,
    prelude::*,
    types::{CallbackQuery, Message},
    utils::command::BotCommands,
};

pub async fn run(bot: Bot, cfg: Config, db: Db) {
    let state_storage: StateStorage = Arc::new(RwLock::new(HashMap::new()));

    // Регистрируем меню команд у Telegram
    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register bot commands: {:?}", err);
    }

    // 1) Текстовые команды
    let commands_branch = Update::filter_message()
        .filter_command::<Command>()
        .endpoint({
            let state_storage = state_storage.clone();
            let db = db.clone();
            move |bot: Bot, msg: Message, cmd: Command| {
                let state_storage = state_storage.clone();
                let db = db.clone();
                async move {
                    if let Err(err) = handle_command(bot, msg, cmd, state_storage, db).await {
                        tracing::error!("command handler error: {:?}", err);
                    }
                    respond(())
                }
            }
        });

    // 2) Inline-callbacks
    let callback_branch = Update::filter_callback_query().endpoint({
        let state_storage = state_storage.clone();
        let cfg = cfg.clone();
        let db = db.clone();
        move |bot: Bot, q: CallbackQuery| {
            let state_storage = state_storage.clone();
            let cfg = cfg.clone();
            let db = db.clone();
            async move {
                if let Err(err) = handle_callback(bot, q, state_storage, cfg, db).await {
                    tracing::error!("callback handler error: {:?}", err);
                }
                respond(())
            }
        }
    });

    // 3) Текстовые сообщения (шаги диалогов)
    let message_branch = Update::filter_message().endpoint({
        let state_storage = state_storage.clone();
        let cfg = cfg.clone();
        let db = db.clone();
        move |bot: Bot, msg: Message| {
            let state_storage = state_storage.clone();
            let cfg = cfg.clone();
            let db = db.clone();
            async move {
                if let Err(err) = handle_message(bot, msg, state_storage, cfg, db).await {
                    tracing::error!("message handler error: {:?}", err);
                }
                respond(())
            }
        }
    });

    // Собираем все ветки в Dispatcher
    Dispatcher::builder(
        bot,
        dptree::entry()
            .branch(commands_branch)
            .branch(callback_branch)
            .branch(message_branch),
    )
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}
