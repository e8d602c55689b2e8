// src/storage/mod.rs

pub mod db;
pub mod schema;

// Экспортируем нужные функции и типы
pub use db::Db;
pub use db::{
    count_active_tracks, count_recent_confirmed, create_donation, create_submission, get_anon_default,
    get_artist, get_artist_by_tg, get_donation, get_lang, get_submission, get_track, insert_track,
    list_active_tracks_with_file, list_artist_tracks, set_anon_default, set_donation_note,
    set_donation_status, set_lang, set_submission_admin_message, set_submission_status,
    toggle_donation_anon, update_artist_field, upsert_artist,
};
// Экспортируем структуры строк
pub use schema::{Artist, DonationEvent, Submission, Track};
