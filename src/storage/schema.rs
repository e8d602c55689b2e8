// src/storage/schema.rs

//! Определение схемы базы данных SQLite с использованием sqlx.

use sqlx::sqlite::SqlitePool;
use sqlx::{Error, FromRow};
use tracing::info;

/// Асинхронная функция для применения миграций и создания таблиц.
pub async fn apply_migrations(pool: &SqlitePool) -> Result<(), Error> {
    info!("Applying database migrations...");

    // Настройки пользователя (язык, анонимность по умолчанию)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_settings (
            user_id INTEGER PRIMARY KEY,
            lang TEXT NOT NULL DEFAULT 'uz',
            anonymous_default INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Артисты (авторы, загружающие треки)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            artist_id TEXT PRIMARY KEY,
            tg_user_id BIGINT NOT NULL UNIQUE,
            display_name TEXT NOT NULL,
            payment_link TEXT,
            profile_url TEXT,
            default_genre TEXT,
            bio TEXT,
            created_at INTEGER NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Заявки на модерацию
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submissions (
            submission_id TEXT PRIMARY KEY,
            artist_id TEXT NOT NULL,
            submitter_user_id BIGINT NOT NULL,
            title TEXT NOT NULL,
            genre TEXT NOT NULL,
            caption TEXT,
            telegram_file_id TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'PENDING' CHECK(status IN ('PENDING', 'APPROVED', 'REJECTED')),
            admin_message_id BIGINT,
            created_at INTEGER NOT NULL,
            reviewed_at INTEGER
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Опубликованные треки
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            track_id TEXT PRIMARY KEY,
            artist_id TEXT NOT NULL,
            title TEXT NOT NULL,
            genre TEXT NOT NULL,
            caption TEXT,
            telegram_file_id TEXT,
            channel_message_id BIGINT NOT NULL,
            discussion_anchor_message_id BIGINT NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'ACTIVE',
            created_at INTEGER NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Донаты
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS donation_events (
            donation_id TEXT PRIMARY KEY,
            track_id TEXT NOT NULL,
            artist_id TEXT NOT NULL,
            donor_user_id BIGINT,
            donor_name TEXT,
            donor_username TEXT,
            amount BIGINT NOT NULL,
            note TEXT,
            is_anonymous INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL CHECK(status IN ('CREATED', 'CONFIRMED', 'CANCELED')),
            created_at INTEGER NOT NULL,
            confirmed_at INTEGER
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Индексы под основные выборки
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_tracks_artist_status
        ON tracks (artist_id, status, created_at);
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_donations_donor_track_status
        ON donation_events (donor_user_id, track_id, status);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database migrations applied successfully.");
    Ok(())
}

// Структура, соответствующая строке в таблице artists
#[derive(Debug, FromRow, Clone)]
pub struct Artist {
    pub artist_id: String,
    pub tg_user_id: i64,
    pub display_name: String,
    pub payment_link: Option<String>,
    pub profile_url: Option<String>,
    pub default_genre: Option<String>,
    pub bio: Option<String>,
    pub created_at: i64,
}

// Структура, соответствующая строке в таблице submissions
#[derive(Debug, FromRow, Clone)]
pub struct Submission {
    pub submission_id: String,
    pub artist_id: String,
    pub submitter_user_id: i64,
    pub title: String,
    pub genre: String,
    pub caption: Option<String>,
    pub telegram_file_id: String,
    pub status: String, // "PENDING", "APPROVED", "REJECTED"
    pub admin_message_id: Option<i64>,
    pub created_at: i64,
    pub reviewed_at: Option<i64>,
}

// Структура, соответствующая строке в таблице tracks
#[derive(Debug, FromRow, Clone)]
pub struct Track {
    pub track_id: String,
    pub artist_id: String,
    pub title: String,
    pub genre: String,
    pub caption: Option<String>,
    pub telegram_file_id: Option<String>,
    pub channel_message_id: i64,
    pub discussion_anchor_message_id: i64,
    pub status: String, // "ACTIVE", "HIDDEN"
    pub created_at: i64,
}

// Структура, соответствующая строке в таблице donation_events
#[derive(Debug, FromRow, Clone)]
pub struct DonationEvent {
    pub donation_id: String,
    pub track_id: String,
    pub artist_id: String,
    pub donor_user_id: Option<i64>,
    pub donor_name: Option<String>,
    pub donor_username: Option<String>,
    pub amount: i64,
    pub note: Option<String>,
    pub is_anonymous: i64,
    pub status: String, // "CREATED", "CONFIRMED", "CANCELED"
    pub created_at: i64,
    pub confirmed_at: Option<i64>,
}
