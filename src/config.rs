// src/config.rs
use anyhow::Result;
use config::{Config as Loader, Environment, File};
use serde::Deserialize;
use std::env;
use teloxide::types::{ChatId, Recipient};

use crate::models::Genre;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub admin_id: i64,
    #[serde(default)]
    pub bot_username: String,

    // SQLite
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,

    #[serde(default = "default_app_name")]
    pub app_name: String,

    // Лимит подтверждённых донатов (на донора и трек в час)
    #[serde(default = "default_max_donations_per_hour")]
    pub max_donations_per_hour: i64,

    // Каналы по жанрам (числовой chat id или @username, пусто = не настроен)
    #[serde(default)]
    pub channel_pop: String,
    #[serde(default)]
    pub channel_rock: String,
    #[serde(default)]
    pub channel_hiphop: String,
    #[serde(default)]
    pub channel_discovery: String,

    // Группы обсуждений (для благодарностей под треками)
    #[serde(default)]
    pub discussion_pop: String,
    #[serde(default)]
    pub discussion_rock: String,
    #[serde(default)]
    pub discussion_hiphop: String,
    #[serde(default)]
    pub discussion_discovery: String,
}

fn default_sqlite_path() -> String {
    "data/sado.db".into()
}
fn default_app_name() -> String {
    "Sado Music".into()
}
fn default_max_donations_per_hour() -> i64 {
    5
}

/// chat id из конфига: число — ChatId, `@username` — имя канала.
pub fn parse_recipient(val: &str) -> Option<Recipient> {
    let val = val.trim();
    if val.is_empty() {
        return None;
    }
    match val.parse::<i64>() {
        Ok(id) => Some(Recipient::Id(ChatId(id))),
        Err(_) => Some(Recipient::ChannelUsername(val.to_string())),
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let file = env::var("SADO_CONFIG").unwrap_or_else(|_| "Config.toml".into());
        let loader = Loader::builder()
            .add_source(File::with_name(&file).required(false))
            .add_source(Environment::with_prefix("SADO").separator("__"))
            .build()?;
        Ok(loader.try_deserialize()?)
    }

    /// Канал для жанра. Rap публикуется вместе с Hip Hop, нишевые жанры
    /// уходят в discovery-канал.
    pub fn channel_for_genre(&self, genre: Genre) -> Option<Recipient> {
        let raw = match genre {
            Genre::Pop => &self.channel_pop,
            Genre::Rock => &self.channel_rock,
            Genre::HipHop | Genre::Rap => &self.channel_hiphop,
            Genre::Indie | Genre::Electronic | Genre::Other => &self.channel_discovery,
        };
        parse_recipient(raw)
    }

    /// Группа обсуждений для жанра, той же схемой, что и каналы.
    pub fn discussion_for_genre(&self, genre: Genre) -> Option<Recipient> {
        let raw = match genre {
            Genre::Pop => &self.discussion_pop,
            Genre::Rock => &self.discussion_rock,
            Genre::HipHop | Genre::Rap => &self.discussion_hiphop,
            Genre::Indie | Genre::Electronic | Genre::Other => &self.discussion_discovery,
        };
        parse_recipient(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            bot_token: "test_token".into(),
            admin_id: 12345,
            bot_username: "test_bot".into(),
            sqlite_path: "data/test.db".into(),
            app_name: "Test Sado Music".into(),
            max_donations_per_hour: 5,
            channel_pop: "@pop_channel".into(),
            channel_rock: "-1001234567890".into(),
            channel_hiphop: "@hiphop_channel".into(),
            channel_discovery: String::new(),
            discussion_pop: "@pop_discussion".into(),
            discussion_rock: String::new(),
            discussion_hiphop: "@hiphop_discussion".into(),
            discussion_discovery: String::new(),
        }
    }

    #[test]
    fn test_parse_recipient() {
        assert_eq!(
            parse_recipient("-1001234567890"),
            Some(Recipient::Id(ChatId(-1001234567890)))
        );
        assert_eq!(
            parse_recipient("@channel"),
            Some(Recipient::ChannelUsername("@channel".into()))
        );
        assert_eq!(parse_recipient("   "), None);
        assert_eq!(parse_recipient(""), None);
    }

    #[test]
    fn test_channel_routing() {
        let cfg = test_config();
        assert_eq!(
            cfg.channel_for_genre(Genre::Pop),
            Some(Recipient::ChannelUsername("@pop_channel".into()))
        );
        assert_eq!(
            cfg.channel_for_genre(Genre::Rock),
            Some(Recipient::Id(ChatId(-1001234567890)))
        );
        // Rap идёт в hip-hop канал
        assert_eq!(
            cfg.channel_for_genre(Genre::Rap),
            cfg.channel_for_genre(Genre::HipHop)
        );
        // Ненастроенный discovery — None
        assert_eq!(cfg.channel_for_genre(Genre::Indie), None);
        assert_eq!(cfg.channel_for_genre(Genre::Other), None);
    }

    #[test]
    fn test_discussion_routing() {
        let cfg = test_config();
        assert_eq!(
            cfg.discussion_for_genre(Genre::Pop),
            Some(Recipient::ChannelUsername("@pop_discussion".into()))
        );
        assert_eq!(cfg.discussion_for_genre(Genre::Rock), None);
    }
}
