// src/router/donations.rs

//! Донат-роутер: диалог с выбором суммы, заметкой и анонимностью,
//! подтверждение (демо-режим), благодарность в группе обсуждений и
//! уведомление артиста.

use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, MaybeInaccessibleMessage, MessageId, ParseMode, ReplyParameters, User,
};
use tracing::{info, warn};

use super::{StateStorage, UserState, clear_state, set_state};
use crate::config::Config;
use crate::i18n::{Phrase, t};
use crate::keyboards::{
    kb_donation_amounts, kb_donation_anonymity, kb_donation_confirm, kb_donation_note_options,
};
use crate::models::{DonationStatus, Lang, NewDonation, TrackStatus};
use crate::storage::{self, Artist, Db, Track};
use crate::texts;
use crate::utils::{clean_note, format_amount};

/// Окно лимита подтверждённых донатов
const DONATION_WINDOW_SECS: i64 = 3600;

const MIN_AMOUNT: i64 = 1000;
const MAX_AMOUNT: i64 = 1_000_000;

enum TrackLookup {
    Found(Track, Artist),
    NotFound,
    Inactive,
    NoArtist,
}

async fn load_track_for_donation(db: &Db, track_id: &str) -> anyhow::Result<TrackLookup> {
    let Some(track) = storage::get_track(db, track_id).await? else {
        return Ok(TrackLookup::NotFound);
    };
    if track.status != TrackStatus::Active.as_str() {
        return Ok(TrackLookup::Inactive);
    }
    let Some(artist) = storage::get_artist(db, &track.artist_id).await? else {
        return Ok(TrackLookup::NoArtist);
    };
    Ok(TrackLookup::Found(track, artist))
}

fn amount_card(amount: i64, track_title: &str, artist_name: &str) -> String {
    format!(
        "✅ Amount: <b>{} so'm</b>\n\n🎵 {}\n🎤 {}\n\nWould you like to add a message for the artist?",
        format_amount(amount),
        track_title,
        artist_name,
    )
}

/// Старт диалога: карточка трека и выбор суммы (deep link или кнопка
/// поддержки в профиле).
pub async fn start_donation_dialog(
    bot: &Bot,
    chat_id: ChatId,
    track_id: &str,
    db: &Db,
    lang: Lang,
) -> anyhow::Result<()> {
    match load_track_for_donation(db, track_id).await? {
        TrackLookup::Found(track, artist) => {
            bot.send_message(
                chat_id,
                texts::donation_start_text(&track.title, &artist.display_name),
            )
            .parse_mode(ParseMode::Html)
            .reply_markup(kb_donation_amounts(track_id))
            .await?;
        }
        TrackLookup::NotFound => {
            bot.send_message(chat_id, t(lang, Phrase::TrackNotFound)).await?;
        }
        TrackLookup::Inactive => {
            bot.send_message(chat_id, t(lang, Phrase::TrackInactive)).await?;
        }
        TrackLookup::NoArtist => {
            bot.send_message(chat_id, t(lang, Phrase::ArtistNotFound)).await?;
        }
    }
    Ok(())
}

/// Создаёт донат и спрашивает про заметку (после выбора суммы кнопкой).
async fn create_donation_and_ask_note_cb(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    track_id: &str,
    amount: i64,
    db: &Db,
) -> anyhow::Result<()> {
    let (track, artist) = match load_track_for_donation(db, track_id).await? {
        TrackLookup::Found(track, artist) => (track, artist),
        TrackLookup::NotFound => {
            bot.answer_callback_query(q.id.clone())
                .text("Track not found")
                .show_alert(true)
                .await?;
            return Ok(());
        }
        TrackLookup::Inactive => {
            bot.answer_callback_query(q.id.clone())
                .text("Track is no longer active")
                .show_alert(true)
                .await?;
            return Ok(());
        }
        TrackLookup::NoArtist => {
            bot.answer_callback_query(q.id.clone())
                .text("Artist not found")
                .show_alert(true)
                .await?;
            return Ok(());
        }
    };

    let donation_id = storage::create_donation(
        db,
        &NewDonation {
            track_id: track.track_id.clone(),
            artist_id: track.artist_id.clone(),
            donor_user_id: q.from.id.0 as i64,
            donor_name: q.from.full_name(),
            donor_username: q.from.username.clone(),
            amount,
            is_anonymous: false,
        },
    )
    .await?;
    info!("Created donation {} for track {}", donation_id, track.track_id);

    bot.edit_message_text(
        chat_id,
        message_id,
        amount_card(amount, &track.title, &artist.display_name),
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(kb_donation_note_options(&donation_id))
    .await?;
    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

/// Итоговая карточка подтверждения.
async fn show_final_confirmation(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    donation_id: &str,
    db: &Db,
) -> anyhow::Result<()> {
    let Some(donation) = storage::get_donation(db, donation_id).await? else {
        bot.answer_callback_query(q.id.clone())
            .text("Not found")
            .show_alert(true)
            .await?;
        return Ok(());
    };

    let track = storage::get_track(db, &donation.track_id).await?;
    let artist = storage::get_artist(db, &donation.artist_id).await?;
    let (Some(track), Some(artist)) = (track, artist) else {
        bot.answer_callback_query(q.id.clone())
            .text("Missing data")
            .show_alert(true)
            .await?;
        return Ok(());
    };

    let anon = donation.is_anonymous != 0;
    let text = texts::donation_dm_card(
        &track.title,
        &artist.display_name,
        donation.amount,
        anon,
        donation.note.as_deref(),
    );
    bot.edit_message_text(chat_id, message_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(kb_donation_confirm(
            donation_id,
            anon,
            donation.note.is_some(),
        ))
        .await?;
    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

/// Подтверждение доната: лимит, статус, благодарность, уведомление.
async fn confirm_donation(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    donation_id: &str,
    cfg: &Config,
    db: &Db,
) -> anyhow::Result<()> {
    let Some(donation) = storage::get_donation(db, donation_id).await? else {
        bot.answer_callback_query(q.id.clone())
            .text("Not found.")
            .show_alert(true)
            .await?;
        return Ok(());
    };
    if donation.status != DonationStatus::Created.as_str() {
        bot.answer_callback_query(q.id.clone())
            .text("Already processed.")
            .show_alert(true)
            .await?;
        return Ok(());
    }

    // Лимит подтверждений: на донора и трек в час
    if let Some(donor_id) = donation.donor_user_id {
        let confirmed =
            storage::count_recent_confirmed(db, donor_id, &donation.track_id, DONATION_WINDOW_SECS)
                .await?;
        if confirmed >= cfg.max_donations_per_hour {
            info!(
                "Donation limit reached for donor {} on track {}",
                donor_id, donation.track_id
            );
            bot.answer_callback_query(q.id.clone())
                .text("⏳ Donation limit reached for this track. Try again later.")
                .show_alert(true)
                .await?;
            return Ok(());
        }
    }

    storage::set_donation_status(db, donation_id, DonationStatus::Confirmed).await?;

    let track = storage::get_track(db, &donation.track_id).await?;
    let artist = storage::get_artist(db, &donation.artist_id).await?;
    let (Some(track), Some(artist)) = (track, artist) else {
        bot.answer_callback_query(q.id.clone())
            .text("Missing data.")
            .show_alert(true)
            .await?;
        return Ok(());
    };

    let is_anon = donation.is_anonymous != 0;

    // 1) Публичная благодарность в группе обсуждений, ответом на якорь
    let donor_public = if is_anon {
        "Someone".to_string()
    } else {
        donation
            .donor_name
            .clone()
            .unwrap_or_else(|| q.from.full_name())
    };
    let appreciation = texts::appreciation_public(
        &donor_public,
        donation.amount,
        &artist.display_name,
        &track.title,
        donation.note.as_deref(),
    );
    let discussion = crate::models::Genre::parse(&track.genre)
        .and_then(|genre| cfg.discussion_for_genre(genre));
    if let Some(discussion) = discussion {
        if track.discussion_anchor_message_id != 0 {
            let sent = bot
                .send_message(discussion, appreciation)
                .parse_mode(ParseMode::Html)
                .reply_parameters(ReplyParameters::new(MessageId(
                    track.discussion_anchor_message_id as i32,
                )))
                .await;
            match sent {
                Ok(_) => info!("Posted appreciation for donation {}", donation_id),
                Err(e) => warn!("Failed to post appreciation: {}", e),
            }
        }
    }

    // 2) Личное уведомление артисту
    let dm = texts::creator_dm(
        is_anon,
        donation.donor_name.as_deref(),
        donation.donor_username.as_deref(),
        donation.amount,
        &track.title,
        donation.note.as_deref(),
    );
    if let Err(e) = bot
        .send_message(ChatId(artist.tg_user_id), dm)
        .parse_mode(ParseMode::Html)
        .await
    {
        warn!("Failed to DM artist {}: {}", artist.tg_user_id, e);
    }

    // 3) Обновляем карточку донора
    if let Err(e) = bot
        .edit_message_text(
            chat_id,
            message_id,
            "✅ Donation confirmed (Demo). Thanks for supporting the artist!",
        )
        .await
    {
        warn!("Failed to edit confirmation message: {}", e);
    }
    bot.answer_callback_query(q.id.clone()).text("Confirmed ✅").await?;
    info!("Confirmed donation {}", donation_id);
    Ok(())
}

/// Callbacks донат-диалога.
pub async fn handle_callback(
    bot: &Bot,
    q: &CallbackQuery,
    data: &str,
    state_storage: &StateStorage,
    cfg: &Config,
    db: &Db,
) -> anyhow::Result<()> {
    let user_id = q.from.id.0 as i64;
    let Some(MaybeInaccessibleMessage::Regular(message)) = q.message.as_ref() else {
        let _ = bot.answer_callback_query(q.id.clone()).await;
        return Ok(());
    };
    let chat_id = message.chat.id;
    let message_id = message.id;

    // --- Отмена до создания доната ---
    if data == "doncancel" {
        bot.edit_message_text(chat_id, message_id, "❌ Donation canceled.")
            .await?;
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    }

    // --- Выбор суммы ---
    if let Some(rest) = data.strip_prefix("donamtsel:") {
        let Some((track_id, amount_str)) = rest.rsplit_once(':') else {
            bot.answer_callback_query(q.id.clone())
                .text("Invalid data")
                .show_alert(true)
                .await?;
            return Ok(());
        };
        if amount_str == "custom" {
            set_state(
                state_storage,
                chat_id,
                UserState::DonationCustomAmount {
                    track_id: track_id.to_string(),
                },
            );
            bot.edit_message_text(
                chat_id,
                message_id,
                "✏️ Enter custom amount in so'm (e.g., 15000):",
            )
            .await?;
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        }
        let Ok(amount) = amount_str.parse::<i64>() else {
            bot.answer_callback_query(q.id.clone())
                .text("Invalid amount")
                .show_alert(true)
                .await?;
            return Ok(());
        };
        return create_donation_and_ask_note_cb(bot, q, chat_id, message_id, track_id, amount, db)
            .await;
    }

    // --- Пропуск заметки: сразу к выбору видимости ---
    if let Some(donation_id) = data.strip_prefix("don_skip_note:") {
        if storage::get_donation(db, donation_id).await?.is_none() {
            bot.answer_callback_query(q.id.clone())
                .text("Not found")
                .show_alert(true)
                .await?;
            return Ok(());
        }
        bot.edit_message_text(chat_id, message_id, "Choose your donation visibility:")
            .reply_markup(kb_donation_anonymity(donation_id))
            .await?;
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    }

    // --- Выбор видимости ---
    if let Some(donation_id) = data.strip_prefix("don_public:") {
        let Some(donation) = storage::get_donation(db, donation_id).await? else {
            bot.answer_callback_query(q.id.clone())
                .text("Not found")
                .show_alert(true)
                .await?;
            return Ok(());
        };
        if donation.is_anonymous != 0 {
            storage::toggle_donation_anon(db, donation_id).await?;
        }
        return show_final_confirmation(bot, q, chat_id, message_id, donation_id, db).await;
    }
    if let Some(donation_id) = data.strip_prefix("don_anon_set:") {
        let Some(donation) = storage::get_donation(db, donation_id).await? else {
            bot.answer_callback_query(q.id.clone())
                .text("Not found")
                .show_alert(true)
                .await?;
            return Ok(());
        };
        if donation.is_anonymous == 0 {
            storage::toggle_donation_anon(db, donation_id).await?;
        }
        return show_final_confirmation(bot, q, chat_id, message_id, donation_id, db).await;
    }

    // --- Тумблер анонимности на итоговой карточке ---
    if let Some(donation_id) = data.strip_prefix("don_anon:") {
        let Some(donation) = storage::get_donation(db, donation_id).await? else {
            bot.answer_callback_query(q.id.clone())
                .text("Not found.")
                .show_alert(true)
                .await?;
            return Ok(());
        };
        if donation.status != DonationStatus::Created.as_str() {
            bot.answer_callback_query(q.id.clone())
                .text("Not editable.")
                .show_alert(true)
                .await?;
            return Ok(());
        }

        let new_anon = storage::toggle_donation_anon(db, donation_id).await?;
        // Запоминаем как предпочтение донора
        storage::set_anon_default(db, user_id, new_anon).await?;

        let track = storage::get_track(db, &donation.track_id).await?;
        let artist = storage::get_artist(db, &donation.artist_id).await?;
        let (Some(track), Some(artist)) = (track, artist) else {
            bot.answer_callback_query(q.id.clone())
                .text("Missing data.")
                .show_alert(true)
                .await?;
            return Ok(());
        };

        let text = texts::donation_dm_card(
            &track.title,
            &artist.display_name,
            donation.amount,
            new_anon,
            donation.note.as_deref(),
        );
        if let Err(e) = bot
            .edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(kb_donation_confirm(
                donation_id,
                new_anon,
                donation.note.is_some(),
            ))
            .await
        {
            warn!("Failed to edit donation card {}: {}", donation_id, e);
        }
        bot.answer_callback_query(q.id.clone()).text("Updated.").await?;
        return Ok(());
    }

    // --- Добавление/правка заметки ---
    if let Some(donation_id) = data.strip_prefix("don_note:") {
        let Some(donation) = storage::get_donation(db, donation_id).await? else {
            bot.answer_callback_query(q.id.clone())
                .text("Not found.")
                .show_alert(true)
                .await?;
            return Ok(());
        };
        if donation.status != DonationStatus::Created.as_str() {
            bot.answer_callback_query(q.id.clone())
                .text("Not editable.")
                .show_alert(true)
                .await?;
            return Ok(());
        }
        set_state(
            state_storage,
            chat_id,
            UserState::DonationNote {
                donation_id: donation_id.to_string(),
                card_message_id: message_id.0,
            },
        );
        bot.answer_callback_query(q.id.clone()).await?;
        bot.send_message(
            chat_id,
            "Send your note (max 120 chars). Links will be removed.",
        )
        .await?;
        return Ok(());
    }

    // --- Отмена созданного доната ---
    if let Some(donation_id) = data.strip_prefix("don_cancel:") {
        let Some(donation) = storage::get_donation(db, donation_id).await? else {
            bot.answer_callback_query(q.id.clone())
                .text("Not found.")
                .show_alert(true)
                .await?;
            return Ok(());
        };
        if donation.status != DonationStatus::Created.as_str() {
            bot.answer_callback_query(q.id.clone())
                .text("Already processed.")
                .show_alert(true)
                .await?;
            return Ok(());
        }
        storage::set_donation_status(db, donation_id, DonationStatus::Canceled).await?;
        if let Err(e) = bot
            .edit_message_text(chat_id, message_id, "❌ Donation canceled.")
            .await
        {
            warn!("Failed to edit message after cancel: {}", e);
        }
        bot.answer_callback_query(q.id.clone()).text("Canceled.").await?;
        return Ok(());
    }

    // --- Подтверждение ---
    if let Some(donation_id) = data.strip_prefix("don_ok:") {
        return confirm_donation(bot, q, chat_id, message_id, donation_id, cfg, db).await;
    }

    // --- Кнопка поддержки под треком в профиле ---
    if let Some(track_id) = data.strip_prefix("support_track:") {
        let lang = storage::get_lang(db, user_id).await?;
        start_donation_dialog(bot, chat_id, track_id, db, lang).await?;
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    }

    warn!("Received unknown donation callback data: {}", data);
    let _ = bot
        .answer_callback_query(q.id.clone())
        .text("Неизвестное действие")
        .await;
    Ok(())
}

/// Сообщения в донатных состояниях: своя сумма и заметка.
pub async fn handle_state_message(
    bot: &Bot,
    msg: &Message,
    state: UserState,
    state_storage: &StateStorage,
    db: &Db,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    let Some(user) = msg.from.clone() else {
        return Ok(());
    };

    match state {
        UserState::DonationCustomAmount { track_id } => {
            let Some(text) = msg.text() else {
                return Ok(());
            };
            handle_custom_amount(bot, chat_id, &user, &track_id, text, state_storage, db).await?;
        }

        UserState::DonationNote {
            donation_id,
            card_message_id,
        } => {
            let Some(text) = msg.text() else {
                return Ok(());
            };
            let note = clean_note(text);
            storage::set_donation_note(db, &donation_id, note.as_deref()).await?;

            let Some(donation) = storage::get_donation(db, &donation_id).await? else {
                bot.send_message(chat_id, "Donation not found.").await?;
                clear_state(state_storage, chat_id);
                return Ok(());
            };
            let track = storage::get_track(db, &donation.track_id).await?;
            let artist = storage::get_artist(db, &donation.artist_id).await?;
            let (Some(track), Some(artist)) = (track, artist) else {
                bot.send_message(chat_id, "Missing data.").await?;
                clear_state(state_storage, chat_id);
                return Ok(());
            };

            // Обновляем исходную карточку подтверждения
            let anon = donation.is_anonymous != 0;
            let card = texts::donation_dm_card(
                &track.title,
                &artist.display_name,
                donation.amount,
                anon,
                donation.note.as_deref(),
            );
            if let Err(e) = bot
                .edit_message_text(chat_id, MessageId(card_message_id), card)
                .parse_mode(ParseMode::Html)
                .reply_markup(kb_donation_confirm(
                    &donation_id,
                    anon,
                    donation.note.is_some(),
                ))
                .await
            {
                warn!("Failed to edit donation card after note: {}", e);
            }
            bot.send_message(chat_id, "✅ Note saved.").await?;
            clear_state(state_storage, chat_id);
        }

        _ => {}
    }
    Ok(())
}

async fn handle_custom_amount(
    bot: &Bot,
    chat_id: ChatId,
    user: &User,
    track_id: &str,
    text: &str,
    state_storage: &StateStorage,
    db: &Db,
) -> anyhow::Result<()> {
    let cleaned: String = text.trim().replace([' ', ','], "");
    let amount = match cleaned.parse::<i64>() {
        Ok(a) => a,
        Err(_) => {
            bot.send_message(chat_id, "❌ Please enter a valid number").await?;
            return Ok(());
        }
    };
    if amount < MIN_AMOUNT {
        bot.send_message(chat_id, "❌ Minimum amount is 1 000 so'm").await?;
        return Ok(());
    }
    if amount > MAX_AMOUNT {
        bot.send_message(chat_id, "❌ Maximum amount is 1 000 000 so'm").await?;
        return Ok(());
    }

    let (track, artist) = match load_track_for_donation(db, track_id).await? {
        TrackLookup::Found(track, artist) => (track, artist),
        TrackLookup::NotFound => {
            bot.send_message(chat_id, "❌ Track not found").await?;
            clear_state(state_storage, chat_id);
            return Ok(());
        }
        TrackLookup::Inactive => {
            bot.send_message(chat_id, "❌ Track is no longer active").await?;
            clear_state(state_storage, chat_id);
            return Ok(());
        }
        TrackLookup::NoArtist => {
            bot.send_message(chat_id, "❌ Artist not found").await?;
            clear_state(state_storage, chat_id);
            return Ok(());
        }
    };

    let donation_id = storage::create_donation(
        db,
        &NewDonation {
            track_id: track.track_id.clone(),
            artist_id: track.artist_id.clone(),
            donor_user_id: user.id.0 as i64,
            donor_name: user.full_name(),
            donor_username: user.username.clone(),
            amount,
            is_anonymous: false,
        },
    )
    .await?;
    info!(
        "Created donation {} (custom amount {}) for track {}",
        donation_id, amount, track.track_id
    );
    clear_state(state_storage, chat_id);

    bot.send_message(
        chat_id,
        amount_card(amount, &track.title, &artist.display_name),
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(kb_donation_note_options(&donation_id))
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_card_contains_details() {
        let card = amount_card(15000, "Bahor", "Sado");
        assert!(card.contains("15 000 so'm"));
        assert!(card.contains("Bahor"));
        assert!(card.contains("Sado"));
    }

    #[test]
    fn test_amount_bounds() {
        assert!(MIN_AMOUNT < MAX_AMOUNT);
        assert_eq!(MIN_AMOUNT, 1000);
        assert_eq!(MAX_AMOUNT, 1_000_000);
    }
}
