// src/storage/db.rs
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{
    Executor, SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
};
use std::{env, path::PathBuf};

use crate::models::{
    ArtistField, DonationStatus, Lang, NewArtist, NewDonation, NewSubmission, NewTrack,
    SubmissionStatus, TrackStatus,
};
use crate::storage::schema::{self, Artist, DonationEvent, Submission, Track};
use crate::utils::new_id;

#[derive(Debug, Clone)]
pub struct Db {
    pub pool: SqlitePool,
}

impl Db {
    /// Подключается к SQLite, создаёт файл, если его нет,
    /// и применяет миграции.
    pub async fn connect(path: &str) -> Result<Self> {
        // 1) абсолютный путь к файлу
        let abs_path: PathBuf = {
            let p = PathBuf::from(path);
            if p.is_absolute() {
                p
            } else {
                env::current_dir()?.join(p)
            }
        };

        // 2) создаём папку, если нужна
        if let Some(dir) = abs_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Не удалось создать директорию {:?}", dir))?;
        }

        // 3) опции подключения: файл создаётся автоматически, WAL
        let opts = SqliteConnectOptions::new()
            .filename(&abs_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePool::connect_with(opts).await?;
        pool.execute("PRAGMA foreign_keys = ON;").await?;

        schema::apply_migrations(&pool).await?;

        Ok(Db { pool })
    }
}

// =====================
// Настройки пользователя
// =====================

pub async fn get_lang(db: &Db, user_id: i64) -> Result<Lang> {
    let code: Option<String> =
        sqlx::query_scalar("SELECT lang FROM user_settings WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&db.pool)
            .await?;
    Ok(code
        .as_deref()
        .and_then(Lang::from_code)
        .unwrap_or_default())
}

pub async fn set_lang(db: &Db, user_id: i64, lang: Lang) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_settings(user_id, lang, anonymous_default)
        VALUES(?, ?, 0)
        ON CONFLICT(user_id) DO UPDATE SET lang = excluded.lang
        "#,
    )
    .bind(user_id)
    .bind(lang.code())
    .execute(&db.pool)
    .await?;
    Ok(())
}

pub async fn get_anon_default(db: &Db, user_id: i64) -> Result<bool> {
    let val: Option<i64> =
        sqlx::query_scalar("SELECT anonymous_default FROM user_settings WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&db.pool)
            .await?;
    Ok(val.unwrap_or(0) != 0)
}

pub async fn set_anon_default(db: &Db, user_id: i64, val: bool) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_settings(user_id, lang, anonymous_default)
        VALUES(?, 'uz', ?)
        ON CONFLICT(user_id) DO UPDATE SET anonymous_default = excluded.anonymous_default
        "#,
    )
    .bind(user_id)
    .bind(val as i64)
    .execute(&db.pool)
    .await?;
    Ok(())
}

// =====================
// Артисты
// =====================

pub async fn upsert_artist(db: &Db, artist: &NewArtist) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO artists(artist_id, tg_user_id, display_name, payment_link,
                            profile_url, default_genre, bio, created_at)
        VALUES(?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(artist_id) DO UPDATE SET
            tg_user_id = excluded.tg_user_id,
            display_name = excluded.display_name,
            payment_link = excluded.payment_link,
            profile_url = excluded.profile_url,
            default_genre = excluded.default_genre,
            bio = excluded.bio
        "#,
    )
    .bind(&artist.artist_id)
    .bind(artist.tg_user_id)
    .bind(&artist.display_name)
    .bind(&artist.payment_link)
    .bind(&artist.profile_url)
    .bind(artist.default_genre.map(|g| g.as_str()))
    .bind(&artist.bio)
    .bind(Utc::now().timestamp())
    .execute(&db.pool)
    .await?;
    Ok(())
}

pub async fn get_artist(db: &Db, artist_id: &str) -> Result<Option<Artist>> {
    let artist = sqlx::query_as::<_, Artist>("SELECT * FROM artists WHERE artist_id = ?")
        .bind(artist_id)
        .fetch_optional(&db.pool)
        .await?;
    Ok(artist)
}

pub async fn get_artist_by_tg(db: &Db, tg_user_id: i64) -> Result<Option<Artist>> {
    let artist = sqlx::query_as::<_, Artist>("SELECT * FROM artists WHERE tg_user_id = ?")
        .bind(tg_user_id)
        .fetch_optional(&db.pool)
        .await?;
    Ok(artist)
}

/// Обновление одного поля профиля. Имя колонки берётся только из
/// закрытого перечисления ArtistField.
pub async fn update_artist_field(
    db: &Db,
    artist_id: &str,
    field: ArtistField,
    value: Option<&str>,
) -> Result<()> {
    let sql = format!(
        "UPDATE artists SET {} = ? WHERE artist_id = ?",
        field.column()
    );
    sqlx::query(&sql)
        .bind(value)
        .bind(artist_id)
        .execute(&db.pool)
        .await?;
    Ok(())
}

// =====================
// Заявки
// =====================

pub async fn create_submission(db: &Db, sub: &NewSubmission) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO submissions(submission_id, artist_id, submitter_user_id, title, genre,
                                caption, telegram_file_id, status, created_at)
        VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&sub.submission_id)
    .bind(&sub.artist_id)
    .bind(sub.submitter_user_id)
    .bind(&sub.title)
    .bind(sub.genre.as_str())
    .bind(&sub.caption)
    .bind(&sub.telegram_file_id)
    .bind(SubmissionStatus::Pending.as_str())
    .bind(Utc::now().timestamp())
    .execute(&db.pool)
    .await?;
    Ok(())
}

pub async fn get_submission(db: &Db, submission_id: &str) -> Result<Option<Submission>> {
    let sub = sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE submission_id = ?")
        .bind(submission_id)
        .fetch_optional(&db.pool)
        .await?;
    Ok(sub)
}

pub async fn set_submission_admin_message(
    db: &Db,
    submission_id: &str,
    admin_msg_id: i64,
) -> Result<()> {
    sqlx::query("UPDATE submissions SET admin_message_id = ? WHERE submission_id = ?")
        .bind(admin_msg_id)
        .bind(submission_id)
        .execute(&db.pool)
        .await?;
    Ok(())
}

pub async fn set_submission_status(
    db: &Db,
    submission_id: &str,
    status: SubmissionStatus,
) -> Result<()> {
    sqlx::query("UPDATE submissions SET status = ?, reviewed_at = ? WHERE submission_id = ?")
        .bind(status.as_str())
        .bind(Utc::now().timestamp())
        .bind(submission_id)
        .execute(&db.pool)
        .await?;
    Ok(())
}

// =====================
// Треки
// =====================

pub async fn insert_track(db: &Db, track: &NewTrack) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO tracks(track_id, artist_id, title, genre, caption, telegram_file_id,
                           channel_message_id, discussion_anchor_message_id, status, created_at)
        VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&track.track_id)
    .bind(&track.artist_id)
    .bind(&track.title)
    .bind(track.genre.as_str())
    .bind(&track.caption)
    .bind(&track.telegram_file_id)
    .bind(track.channel_message_id)
    .bind(track.discussion_anchor_message_id)
    .bind(TrackStatus::Active.as_str())
    .bind(Utc::now().timestamp())
    .execute(&db.pool)
    .await?;
    Ok(())
}

pub async fn get_track(db: &Db, track_id: &str) -> Result<Option<Track>> {
    let track = sqlx::query_as::<_, Track>("SELECT * FROM tracks WHERE track_id = ?")
        .bind(track_id)
        .fetch_optional(&db.pool)
        .await?;
    Ok(track)
}

pub async fn list_artist_tracks(db: &Db, artist_id: &str, limit: i64) -> Result<Vec<Track>> {
    let tracks = sqlx::query_as::<_, Track>(
        r#"
        SELECT * FROM tracks
        WHERE artist_id = ?
        ORDER BY created_at DESC
        LIMIT ?
        "#,
    )
    .bind(artist_id)
    .bind(limit)
    .fetch_all(&db.pool)
    .await?;
    Ok(tracks)
}

/// Активные треки артиста с file_id — для отправки аудио в профиле.
pub async fn list_active_tracks_with_file(
    db: &Db,
    artist_id: &str,
    limit: i64,
) -> Result<Vec<Track>> {
    let tracks = sqlx::query_as::<_, Track>(
        r#"
        SELECT * FROM tracks
        WHERE artist_id = ? AND status = 'ACTIVE'
        ORDER BY created_at DESC
        LIMIT ?
        "#,
    )
    .bind(artist_id)
    .bind(limit)
    .fetch_all(&db.pool)
    .await?;
    Ok(tracks)
}

pub async fn count_active_tracks(db: &Db, artist_id: &str) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM tracks WHERE artist_id = ? AND status = 'ACTIVE'")
            .bind(artist_id)
            .fetch_one(&db.pool)
            .await?;
    Ok(count)
}

// =====================
// Донаты
// =====================

/// Создаёт донат в статусе CREATED и возвращает его id.
pub async fn create_donation(db: &Db, donation: &NewDonation) -> Result<String> {
    let donation_id = new_id("don");
    sqlx::query(
        r#"
        INSERT INTO donation_events(
            donation_id, track_id, artist_id,
            donor_user_id, donor_name, donor_username,
            amount, note, is_anonymous, status, created_at
        )
        VALUES(?, ?, ?, ?, ?, ?, ?, NULL, ?, ?, ?)
        "#,
    )
    .bind(&donation_id)
    .bind(&donation.track_id)
    .bind(&donation.artist_id)
    .bind(donation.donor_user_id)
    .bind(&donation.donor_name)
    .bind(&donation.donor_username)
    .bind(donation.amount)
    .bind(donation.is_anonymous as i64)
    .bind(DonationStatus::Created.as_str())
    .bind(Utc::now().timestamp())
    .execute(&db.pool)
    .await?;
    Ok(donation_id)
}

pub async fn get_donation(db: &Db, donation_id: &str) -> Result<Option<DonationEvent>> {
    let donation =
        sqlx::query_as::<_, DonationEvent>("SELECT * FROM donation_events WHERE donation_id = ?")
            .bind(donation_id)
            .fetch_optional(&db.pool)
            .await?;
    Ok(donation)
}

pub async fn set_donation_note(db: &Db, donation_id: &str, note: Option<&str>) -> Result<()> {
    sqlx::query("UPDATE donation_events SET note = ? WHERE donation_id = ?")
        .bind(note)
        .bind(donation_id)
        .execute(&db.pool)
        .await?;
    Ok(())
}

/// Переключает анонимность и возвращает новое значение.
pub async fn toggle_donation_anon(db: &Db, donation_id: &str) -> Result<bool> {
    let donation = get_donation(db, donation_id)
        .await?
        .context("Donation not found")?;
    let new_val = donation.is_anonymous == 0;
    sqlx::query("UPDATE donation_events SET is_anonymous = ? WHERE donation_id = ?")
        .bind(new_val as i64)
        .bind(donation_id)
        .execute(&db.pool)
        .await?;
    Ok(new_val)
}

pub async fn set_donation_status(
    db: &Db,
    donation_id: &str,
    status: DonationStatus,
) -> Result<()> {
    if status == DonationStatus::Confirmed {
        sqlx::query("UPDATE donation_events SET status = ?, confirmed_at = ? WHERE donation_id = ?")
            .bind(status.as_str())
            .bind(Utc::now().timestamp())
            .bind(donation_id)
            .execute(&db.pool)
            .await?;
    } else {
        sqlx::query("UPDATE donation_events SET status = ? WHERE donation_id = ?")
            .bind(status.as_str())
            .bind(donation_id)
            .execute(&db.pool)
            .await?;
    }
    Ok(())
}

/// Сколько донатов донор подтвердил по треку за окно (для лимита в час).
pub async fn count_recent_confirmed(
    db: &Db,
    donor_user_id: i64,
    track_id: &str,
    window_seconds: i64,
) -> Result<i64> {
    let cutoff = Utc::now().timestamp() - window_seconds;
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM donation_events
        WHERE donor_user_id = ? AND track_id = ? AND status = 'CONFIRMED'
          AND confirmed_at IS NOT NULL AND confirmed_at >= ?
        "#,
    )
    .bind(donor_user_id)
    .bind(track_id)
    .bind(cutoff)
    .fetch_one(&db.pool)
    .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_db() -> Db {
        // Одно соединение, иначе каждая новая коннекция пула получит
        // свою пустую in-memory базу
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory sqlite");
        schema::apply_migrations(&pool)
            .await
            .expect("migrations failed");
        Db { pool }
    }

    fn sample_artist(id: &str, tg: i64) -> NewArtist {
        NewArtist {
            artist_id: id.to_string(),
            tg_user_id: tg,
            display_name: "Sado".into(),
            payment_link: Some("https://payme.uz/sado".into()),
            profile_url: None,
            default_genre: Some(Genre::Pop),
            bio: Some("uz pop".into()),
        }
    }

    fn sample_track(id: &str, artist_id: &str) -> NewTrack {
        NewTrack {
            track_id: id.to_string(),
            artist_id: artist_id.to_string(),
            title: "Bahor".into(),
            genre: Genre::Pop,
            caption: None,
            telegram_file_id: Some("FILE123".into()),
            channel_message_id: 77,
            discussion_anchor_message_id: 0,
        }
    }

    #[tokio::test]
    async fn test_lang_defaults_and_updates() {
        let db = test_db().await;
        assert_eq!(get_lang(&db, 1).await.unwrap(), Lang::Uz);

        set_lang(&db, 1, Lang::Ru).await.unwrap();
        assert_eq!(get_lang(&db, 1).await.unwrap(), Lang::Ru);

        // Смена языка не трогает anonymous_default
        set_anon_default(&db, 1, true).await.unwrap();
        set_lang(&db, 1, Lang::Uz).await.unwrap();
        assert!(get_anon_default(&db, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_artist_upsert_and_lookup() {
        let db = test_db().await;
        upsert_artist(&db, &sample_artist("art_1", 100)).await.unwrap();

        let a = get_artist_by_tg(&db, 100).await.unwrap().unwrap();
        assert_eq!(a.artist_id, "art_1");
        assert_eq!(a.display_name, "Sado");
        assert_eq!(a.default_genre.as_deref(), Some("Pop"));

        update_artist_field(&db, "art_1", ArtistField::Bio, None)
            .await
            .unwrap();
        update_artist_field(&db, "art_1", ArtistField::DisplayName, Some("Sado 2"))
            .await
            .unwrap();
        let a = get_artist(&db, "art_1").await.unwrap().unwrap();
        assert_eq!(a.bio, None);
        assert_eq!(a.display_name, "Sado 2");

        assert!(get_artist(&db, "art_missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_submission_lifecycle() {
        let db = test_db().await;
        let sub = NewSubmission {
            submission_id: "sub_1".into(),
            artist_id: "art_1".into(),
            submitter_user_id: 100,
            title: "Bahor".into(),
            genre: Genre::Rock,
            caption: Some("demo".into()),
            telegram_file_id: "FILE123".into(),
        };
        create_submission(&db, &sub).await.unwrap();

        let s = get_submission(&db, "sub_1").await.unwrap().unwrap();
        assert_eq!(s.status, "PENDING");
        assert_eq!(s.admin_message_id, None);
        assert!(s.reviewed_at.is_none());

        set_submission_admin_message(&db, "sub_1", 42).await.unwrap();
        set_submission_status(&db, "sub_1", SubmissionStatus::Approved)
            .await
            .unwrap();

        let s = get_submission(&db, "sub_1").await.unwrap().unwrap();
        assert_eq!(s.status, "APPROVED");
        assert_eq!(s.admin_message_id, Some(42));
        assert!(s.reviewed_at.is_some());
    }

    #[tokio::test]
    async fn test_tracks_listing_and_count() {
        let db = test_db().await;
        insert_track(&db, &sample_track("trk_1", "art_1")).await.unwrap();
        insert_track(&db, &sample_track("trk_2", "art_1")).await.unwrap();
        insert_track(&db, &sample_track("trk_3", "art_2")).await.unwrap();

        assert_eq!(count_active_tracks(&db, "art_1").await.unwrap(), 2);
        assert_eq!(list_artist_tracks(&db, "art_1", 10).await.unwrap().len(), 2);
        assert_eq!(list_artist_tracks(&db, "art_1", 1).await.unwrap().len(), 1);

        // Скрытый трек выпадает из активных выборок
        sqlx::query("UPDATE tracks SET status = ? WHERE track_id = 'trk_2'")
            .bind(TrackStatus::Hidden.as_str())
            .execute(&db.pool)
            .await
            .unwrap();
        assert_eq!(count_active_tracks(&db, "art_1").await.unwrap(), 1);
        let with_file = list_active_tracks_with_file(&db, "art_1", 10).await.unwrap();
        assert_eq!(with_file.len(), 1);
        assert_eq!(with_file[0].track_id, "trk_1");
    }

    #[tokio::test]
    async fn test_donation_flow() {
        let db = test_db().await;
        let d = NewDonation {
            track_id: "trk_1".into(),
            artist_id: "art_1".into(),
            donor_user_id: 200,
            donor_name: "Ali".into(),
            donor_username: Some("ali".into()),
            amount: 25000,
            is_anonymous: false,
        };
        let id = create_donation(&db, &d).await.unwrap();
        assert!(id.starts_with("don_"));

        let row = get_donation(&db, &id).await.unwrap().unwrap();
        assert_eq!(row.status, "CREATED");
        assert_eq!(row.amount, 25000);
        assert_eq!(row.is_anonymous, 0);
        assert!(row.confirmed_at.is_none());

        assert!(toggle_donation_anon(&db, &id).await.unwrap());
        assert!(!toggle_donation_anon(&db, &id).await.unwrap());

        set_donation_note(&db, &id, Some("good luck")).await.unwrap();
        let row = get_donation(&db, &id).await.unwrap().unwrap();
        assert_eq!(row.note.as_deref(), Some("good luck"));

        set_donation_status(&db, &id, DonationStatus::Confirmed)
            .await
            .unwrap();
        let row = get_donation(&db, &id).await.unwrap().unwrap();
        assert_eq!(row.status, "CONFIRMED");
        assert!(row.confirmed_at.is_some());
    }

    #[tokio::test]
    async fn test_count_recent_confirmed_window() {
        let db = test_db().await;
        let d = NewDonation {
            track_id: "trk_1".into(),
            artist_id: "art_1".into(),
            donor_user_id: 200,
            donor_name: "Ali".into(),
            donor_username: None,
            amount: 5000,
            is_anonymous: false,
        };
        let id1 = create_donation(&db, &d).await.unwrap();
        let id2 = create_donation(&db, &d).await.unwrap();
        set_donation_status(&db, &id1, DonationStatus::Confirmed)
            .await
            .unwrap();

        // Подтверждён только один; второй в CREATED не считается
        assert_eq!(count_recent_confirmed(&db, 200, "trk_1", 3600).await.unwrap(), 1);
        // Чужой донор и чужой трек — ноль
        assert_eq!(count_recent_confirmed(&db, 201, "trk_1", 3600).await.unwrap(), 0);
        assert_eq!(count_recent_confirmed(&db, 200, "trk_2", 3600).await.unwrap(), 0);

        // Старое подтверждение выпадает из окна
        let old = Utc::now().timestamp() - 7200;
        sqlx::query("UPDATE donation_events SET confirmed_at = ? WHERE donation_id = ?")
            .bind(old)
            .bind(&id1)
            .execute(&db.pool)
            .await
            .unwrap();
        assert_eq!(count_recent_confirmed(&db, 200, "trk_1", 3600).await.unwrap(), 0);

        set_donation_status(&db, &id2, DonationStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(count_recent_confirmed(&db, 200, "trk_1", 3600).await.unwrap(), 1);
    }
}
