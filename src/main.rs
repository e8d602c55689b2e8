mod config;
mod i18n;
mod keyboards;
mod logger;
mod models;
mod router;
mod storage;
mod telegram;
mod texts;
mod utils;

use anyhow::Result;
use teloxide::Bot;
use teloxide::prelude::Requester;

#[tokio::main]
async fn main() -> Result<()> {
    // 1) окружение, конфиг и логгер
    dotenv::dotenv().ok();
    let mut cfg = config::Config::load()?;
    logger::init(&cfg);

    // 2) SQLite (файл создаётся сам, миграции применяются при старте)
    let db = storage::Db::connect(&cfg.sqlite_path).await?;

    // 3) Telegram-бот; username нужен для deep link кнопок в каналах
    let bot = Bot::new(&cfg.bot_token);
    if cfg.bot_username.is_empty() {
        let me = bot.get_me().await?;
        cfg.bot_username = me.username().to_string();
    }

    tracing::info!(
        "Starting {} as @{} (admin id {}, db {})",
        cfg.app_name,
        cfg.bot_username,
        cfg.admin_id,
        cfg.sqlite_path
    );

    // 4) запускаем диспетчер
    telegram::run(bot, cfg, db).await;
    Ok(())
}
