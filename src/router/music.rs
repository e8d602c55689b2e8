// src/router/music.rs

//! Пользовательский роутер: онбординг артиста, заявка на публикацию
//! трека, просмотр и редактирование профиля, выбор языка.

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, FileId, InputFile, MaybeInaccessibleMessage, ParseMode};
use tracing::{error, info, warn};

use super::{StateStorage, UserState, clear_state, get_state, set_state};
use crate::config::Config;
use crate::i18n::{self, Phrase, t};
use crate::keyboards::{kb_admin_review, kb_genres, kb_profile_actions, kb_track_support};
use crate::models::{ArtistField, Genre, Lang, NewArtist, NewSubmission};
use crate::storage::{self, Db};
use crate::texts;
use crate::utils::new_id;

/// /submit: у артиста профиль есть — сразу ждём аудио, нет — онбординг.
pub async fn start_submit(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    state_storage: &StateStorage,
    db: &Db,
    lang: Lang,
) -> anyhow::Result<()> {
    match storage::get_artist_by_tg(db, user_id).await? {
        Some(artist) => {
            let default_genre = artist.default_genre.as_deref().and_then(Genre::parse);
            bot.send_message(chat_id, i18n::uploading_as(lang, &artist.display_name))
                .parse_mode(ParseMode::Html)
                .await?;
            set_state(
                state_storage,
                chat_id,
                UserState::SubmitAudio {
                    artist_id: artist.artist_id,
                    default_genre,
                },
            );
        }
        None => {
            bot.send_message(chat_id, t(lang, Phrase::OnboardStart))
                .parse_mode(ParseMode::Html)
                .await?;
            set_state(state_storage, chat_id, UserState::OnboardName);
        }
    }
    Ok(())
}

/// /profile: карточка своего профиля с кнопками редактирования.
pub async fn show_own_profile(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    db: &Db,
    lang: Lang,
) -> anyhow::Result<()> {
    let Some(artist) = storage::get_artist_by_tg(db, user_id).await? else {
        bot.send_message(chat_id, t(lang, Phrase::NoProfile)).await?;
        return Ok(());
    };

    let tracks = storage::list_artist_tracks(db, &artist.artist_id, 5).await?;
    let tracks_text = if tracks.is_empty() {
        "No tracks yet".to_string()
    } else {
        tracks
            .iter()
            .map(|t| format!("• {} ({})", t.title, t.genre))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let profile_text = format!(
        "🎤 <b>{}</b>\n💳 Payment: {}\n🎧 Default genre: {}\n📝 Bio: {}\n\n🎵 <b>Recent tracks:</b>\n{}",
        artist.display_name,
        artist.payment_link.as_deref().unwrap_or("—"),
        artist.default_genre.as_deref().unwrap_or("—"),
        artist.bio.as_deref().unwrap_or("—"),
        tracks_text,
    );

    bot.send_message(chat_id, profile_text)
        .parse_mode(ParseMode::Html)
        .reply_markup(kb_profile_actions())
        .await?;
    Ok(())
}

/// Публичный профиль по deep link `artist_<id>`: карточка и до пяти
/// треков аудиофайлами с кнопкой поддержки.
pub async fn show_public_profile(
    bot: &Bot,
    chat_id: ChatId,
    artist_id: &str,
    db: &Db,
    lang: Lang,
) -> anyhow::Result<()> {
    let Some(artist) = storage::get_artist(db, artist_id).await? else {
        bot.send_message(chat_id, t(lang, Phrase::ArtistNotFound)).await?;
        return Ok(());
    };

    let total = storage::count_active_tracks(db, &artist.artist_id).await?;
    let tracks = storage::list_active_tracks_with_file(db, &artist.artist_id, 10).await?;
    let listing: Vec<(String, String)> = tracks
        .iter()
        .map(|t| (t.title.clone(), t.genre.clone()))
        .collect();

    bot.send_message(
        chat_id,
        texts::artist_profile_text(&artist.display_name, artist.bio.as_deref(), total, &listing),
    )
    .parse_mode(ParseMode::Html)
    .await?;

    // Не больше пяти аудио за раз, чтобы не заспамить чат
    for track in tracks.iter().take(5) {
        let Some(file_id) = track.telegram_file_id.clone() else {
            continue;
        };
        let sent = bot
            .send_audio(chat_id, InputFile::file_id(FileId(file_id)))
            .caption(format!("🎵 <b>{}</b>\n🎧 {}", track.title, track.genre))
            .parse_mode(ParseMode::Html)
            .reply_markup(kb_track_support(&track.track_id))
            .await;
        if let Err(e) = sent {
            warn!("Failed to send track audio {}: {}", track.track_id, e);
        }
    }
    Ok(())
}

/// Callbacks роутера: выбор языка, выбор жанра в трёх диалогах,
/// кнопки редактирования профиля.
pub async fn handle_callback(
    bot: &Bot,
    q: &CallbackQuery,
    data: &str,
    state_storage: &StateStorage,
    db: &Db,
) -> anyhow::Result<()> {
    let user_id = q.from.id.0 as i64;
    let Some(MaybeInaccessibleMessage::Regular(message)) = q.message.as_ref() else {
        let _ = bot.answer_callback_query(q.id.clone()).await;
        return Ok(());
    };
    let chat_id = message.chat.id;
    let message_id = message.id;
    let lang = storage::get_lang(db, user_id).await?;

    // --- Выбор языка ---
    if let Some(code) = data.strip_prefix("lang:") {
        match Lang::from_code(code) {
            Some(new_lang) => {
                storage::set_lang(db, user_id, new_lang).await?;
                bot.edit_message_text(chat_id, message_id, t(new_lang, Phrase::LanguageSaved))
                    .await?;
                bot.answer_callback_query(q.id.clone()).await?;
            }
            None => {
                bot.answer_callback_query(q.id.clone())
                    .text(t(lang, Phrase::InvalidLanguage))
                    .await?;
            }
        }
        return Ok(());
    }

    // --- Жанр в онбординге ---
    if let Some(choice) = data.strip_prefix("onbgenre:") {
        if choice == "CANCEL" {
            clear_state(state_storage, chat_id);
            bot.edit_message_text(chat_id, message_id, t(lang, Phrase::Cancelled))
                .await?;
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        }
        let Some(genre) = Genre::parse(choice) else {
            warn!("Received invalid genre callback data: {}", data);
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        };
        match get_state(state_storage, chat_id) {
            UserState::OnboardGenre { name, payment_link } => {
                set_state(
                    state_storage,
                    chat_id,
                    UserState::OnboardBio {
                        name,
                        payment_link,
                        default_genre: genre,
                    },
                );
                bot.edit_message_text(chat_id, message_id, t(lang, Phrase::BioPrompt))
                    .await?;
            }
            _ => {
                clear_state(state_storage, chat_id);
                bot.edit_message_text(chat_id, message_id, t(lang, Phrase::SessionExpired))
                    .await?;
            }
        }
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    }

    // --- Жанр в заявке ---
    if let Some(choice) = data.strip_prefix("subgenre:") {
        if choice == "CANCEL" {
            clear_state(state_storage, chat_id);
            bot.edit_message_text(chat_id, message_id, t(lang, Phrase::Cancelled))
                .await?;
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        }
        let Some(genre) = Genre::parse(choice) else {
            warn!("Received invalid genre callback data: {}", data);
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        };
        match get_state(state_storage, chat_id) {
            UserState::SubmitGenre {
                artist_id,
                file_id,
                title,
            } => {
                set_state(
                    state_storage,
                    chat_id,
                    UserState::SubmitCaption {
                        artist_id,
                        file_id,
                        title,
                        genre,
                    },
                );
                bot.edit_message_text(chat_id, message_id, t(lang, Phrase::CaptionPrompt))
                    .await?;
            }
            _ => {
                clear_state(state_storage, chat_id);
                bot.edit_message_text(chat_id, message_id, t(lang, Phrase::SessionExpired))
                    .await?;
            }
        }
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    }

    // --- Жанр в профиле ---
    if let Some(choice) = data.strip_prefix("profilegenre:") {
        if choice == "CANCEL" {
            clear_state(state_storage, chat_id);
            bot.edit_message_text(chat_id, message_id, t(lang, Phrase::Cancelled))
                .await?;
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        }
        let Some(genre) = Genre::parse(choice) else {
            warn!("Received invalid genre callback data: {}", data);
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        };
        match get_state(state_storage, chat_id) {
            UserState::ProfileEditGenre { artist_id } => {
                storage::update_artist_field(
                    db,
                    &artist_id,
                    ArtistField::DefaultGenre,
                    Some(genre.as_str()),
                )
                .await?;
                clear_state(state_storage, chat_id);
                bot.edit_message_text(
                    chat_id,
                    message_id,
                    format!("✅ Default genre updated to: {}", genre.as_str()),
                )
                .await?;
            }
            _ => {
                clear_state(state_storage, chat_id);
                bot.edit_message_text(chat_id, message_id, t(lang, Phrase::SessionExpired))
                    .await?;
            }
        }
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    }

    // --- Кнопки редактирования профиля ---
    if let Some(key) = data.strip_prefix("profile:edit:") {
        let Some(field) = ArtistField::from_key(key) else {
            warn!("Received invalid profile edit callback data: {}", data);
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        };
        let Some(artist) = storage::get_artist_by_tg(db, user_id).await? else {
            bot.edit_message_text(chat_id, message_id, t(lang, Phrase::NoProfile))
                .await?;
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        };

        if field == ArtistField::DefaultGenre {
            set_state(
                state_storage,
                chat_id,
                UserState::ProfileEditGenre {
                    artist_id: artist.artist_id,
                },
            );
            bot.edit_message_text(chat_id, message_id, t(lang, Phrase::ChooseGenre))
                .reply_markup(kb_genres("profilegenre"))
                .await?;
        } else {
            let prompt = match field {
                ArtistField::DisplayName => Phrase::EditNamePrompt,
                ArtistField::PaymentLink => Phrase::EditPaymentPrompt,
                _ => Phrase::EditBioPrompt,
            };
            set_state(
                state_storage,
                chat_id,
                UserState::ProfileEditValue {
                    artist_id: artist.artist_id,
                    field,
                },
            );
            bot.edit_message_text(chat_id, message_id, t(lang, prompt))
                .await?;
        }
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    }

    warn!("Received unknown callback data: {}", data);
    let _ = bot
        .answer_callback_query(q.id.clone())
        .text("Неизвестное действие")
        .await;
    Ok(())
}

/// Сообщения в состояниях онбординга, заявки и редактирования профиля.
pub async fn handle_state_message(
    bot: &Bot,
    msg: &Message,
    state: UserState,
    state_storage: &StateStorage,
    cfg: &Config,
    db: &Db,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    let Some(user) = msg.from.clone() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let lang = storage::get_lang(db, user_id).await?;

    match state {
        UserState::OnboardName => {
            let Some(text) = msg.text() else {
                return Ok(());
            };
            let name = text.trim();
            if name.chars().count() < 2 {
                bot.send_message(chat_id, t(lang, Phrase::NameTooShort)).await?;
                return Ok(());
            }
            set_state(
                state_storage,
                chat_id,
                UserState::OnboardPaymentLink {
                    name: name.to_string(),
                },
            );
            bot.send_message(chat_id, t(lang, Phrase::PaymentPrompt))
                .parse_mode(ParseMode::Html)
                .await?;
        }

        UserState::OnboardPaymentLink { name } => {
            let Some(text) = msg.text() else {
                return Ok(());
            };
            let link = text.trim();
            if !(link.starts_with("http://") || link.starts_with("https://")) {
                bot.send_message(chat_id, t(lang, Phrase::InvalidUrl)).await?;
                return Ok(());
            }
            set_state(
                state_storage,
                chat_id,
                UserState::OnboardGenre {
                    name,
                    payment_link: link.to_string(),
                },
            );
            bot.send_message(chat_id, t(lang, Phrase::GenrePrompt))
                .reply_markup(kb_genres("onbgenre"))
                .await?;
        }

        UserState::OnboardBio {
            name,
            payment_link,
            default_genre,
        } => {
            let Some(text) = msg.text() else {
                return Ok(());
            };
            let bio = text.trim();
            let bio = if bio == "-" || bio.is_empty() {
                None
            } else {
                Some(bio.to_string())
            };

            let artist_id = new_id("art");
            storage::upsert_artist(
                db,
                &NewArtist {
                    artist_id: artist_id.clone(),
                    tg_user_id: user_id,
                    display_name: name,
                    payment_link: Some(payment_link),
                    profile_url: None,
                    default_genre: Some(default_genre),
                    bio,
                },
            )
            .await?;
            info!("Created artist profile {} for user {}", artist_id, user_id);

            set_state(
                state_storage,
                chat_id,
                UserState::SubmitAudio {
                    artist_id,
                    default_genre: Some(default_genre),
                },
            );
            bot.send_message(chat_id, t(lang, Phrase::ProfileCreated)).await?;
        }

        UserState::SubmitAudio {
            artist_id,
            default_genre,
        } => {
            // Ждём именно аудио; остальное молча пропускаем
            let Some(audio) = msg.audio() else {
                return Ok(());
            };
            set_state(
                state_storage,
                chat_id,
                UserState::SubmitTitle {
                    artist_id,
                    default_genre,
                    file_id: audio.file.id.0.clone(),
                },
            );
            bot.send_message(chat_id, t(lang, Phrase::SendTitle)).await?;
        }

        UserState::SubmitTitle {
            artist_id,
            default_genre,
            file_id,
        } => {
            let Some(text) = msg.text() else {
                return Ok(());
            };
            let title = text.trim();
            if title.chars().count() < 2 {
                bot.send_message(chat_id, t(lang, Phrase::TitleTooShort)).await?;
                return Ok(());
            }
            set_state(
                state_storage,
                chat_id,
                UserState::SubmitGenre {
                    artist_id,
                    file_id,
                    title: title.to_string(),
                },
            );
            let prompt = match default_genre {
                Some(genre) => i18n::choose_genre_default(lang, genre),
                None => t(lang, Phrase::ChooseGenre).to_string(),
            };
            bot.send_message(chat_id, prompt)
                .reply_markup(kb_genres("subgenre"))
                .await?;
        }

        UserState::SubmitCaption {
            artist_id,
            file_id,
            title,
            genre,
        } => {
            let Some(text) = msg.text() else {
                return Ok(());
            };
            let caption = text.trim();
            let caption = if caption == "-" || caption.is_empty() {
                None
            } else {
                Some(caption.to_string())
            };

            let Some(artist) = storage::get_artist(db, &artist_id).await? else {
                bot.send_message(chat_id, t(lang, Phrase::SomethingWrong)).await?;
                clear_state(state_storage, chat_id);
                return Ok(());
            };

            let submission_id = new_id("sub");
            let submission = NewSubmission {
                submission_id: submission_id.clone(),
                artist_id,
                submitter_user_id: user_id,
                title: title.clone(),
                genre,
                caption: caption.clone(),
                telegram_file_id: file_id.clone(),
            };
            if let Err(e) = storage::create_submission(db, &submission).await {
                error!("Failed to create submission: {}", e);
                bot.send_message(chat_id, i18n::submission_failed(lang, &e.to_string()))
                    .parse_mode(ParseMode::Html)
                    .await?;
                clear_state(state_storage, chat_id);
                return Ok(());
            }

            // Отправляем трек админу на модерацию
            let mut review_caption = format!(
                "🎵 <b>New Submission</b>\n\n<b>Title:</b> {}\n<b>Artist:</b> {}\n<b>Genre:</b> {}\n",
                title,
                artist.display_name,
                genre.as_str(),
            );
            if let Some(c) = &caption {
                review_caption.push_str(&format!("<b>Caption:</b> {}\n", c));
            }
            if let Some(link) = &artist.payment_link {
                review_caption.push_str(&format!("<b>Payment:</b> {}\n", link));
            }
            review_caption.push_str(&format!("\n<code>ID: {}</code>", submission_id));

            match bot
                .send_audio(ChatId(cfg.admin_id), InputFile::file_id(FileId(file_id)))
                .caption(review_caption)
                .parse_mode(ParseMode::Html)
                .reply_markup(kb_admin_review(&submission_id))
                .await
            {
                Ok(admin_msg) => {
                    storage::set_submission_admin_message(
                        db,
                        &submission_id,
                        admin_msg.id.0 as i64,
                    )
                    .await?;
                    info!("Sent submission {} to admin", submission_id);
                }
                Err(e) => {
                    // Заявка остаётся в PENDING, админ увидит её при разборе БД
                    error!("Failed to send submission {} to admin: {}", submission_id, e);
                }
            }

            bot.send_message(
                chat_id,
                i18n::submission_received(lang, &title, &submission_id),
            )
            .parse_mode(ParseMode::Html)
            .await?;
            clear_state(state_storage, chat_id);
        }

        UserState::ProfileEditValue { artist_id, field } => {
            let Some(text) = msg.text() else {
                return Ok(());
            };
            let val = text.trim();
            let value = if val.is_empty() || (val == "-" && field == ArtistField::Bio) {
                None
            } else {
                Some(val)
            };
            storage::update_artist_field(db, &artist_id, field, value).await?;
            bot.send_message(chat_id, t(lang, Phrase::Updated)).await?;
            clear_state(state_storage, chat_id);
        }

        // Состояния с выбором по кнопкам: текст игнорируем
        UserState::OnboardGenre { .. }
        | UserState::SubmitGenre { .. }
        | UserState::ProfileEditGenre { .. } => {}

        // Донатные состояния обрабатывает donations-роутер
        UserState::DonationCustomAmount { .. }
        | UserState::DonationNote { .. }
        | UserState::None => {}
    }

    Ok(())
}
