// src/keyboards.rs

//! Inline-клавиатуры. Словарь callback-данных:
//! `lang:`, `<prefix>:<жанр|CANCEL>`, `profile:edit:<поле>`,
//! `admin_approve:`/`admin_reject:`, `donamtsel:`, `don_*`, `doncancel`,
//! `support_track:`.

use anyhow::Result;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

use crate::models::GENRES;
use crate::utils::format_amount;

pub const PRESET_AMOUNTS: [i64; 3] = [5000, 10000, 25000];

/// Выбор языка
pub fn kb_lang() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("🇺🇿 O'zbekcha", "lang:uz"),
        InlineKeyboardButton::callback("🇷🇺 Русский", "lang:ru"),
    ]])
}

/// Сетка жанров по две кнопки в ряд, с отменой. Префикс различает
/// онбординг (`onbgenre`), заявку (`subgenre`) и профиль (`profilegenre`).
pub fn kb_genres(prefix: &str) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    let mut row: Vec<InlineKeyboardButton> = Vec::new();
    for g in GENRES {
        row.push(InlineKeyboardButton::callback(
            g.as_str(),
            format!("{}:{}", prefix, g.as_str()),
        ));
        if row.len() == 2 {
            rows.push(std::mem::take(&mut row));
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows.push(vec![InlineKeyboardButton::callback(
        "❌ Cancel",
        format!("{}:CANCEL", prefix),
    )]);
    InlineKeyboardMarkup::new(rows)
}

/// Кнопки под постом в канале — deep link в бота на донат и профиль.
pub fn kb_track_post(
    track_id: &str,
    artist_id: &str,
    bot_username: &str,
) -> Result<InlineKeyboardMarkup> {
    let donate = Url::parse(&format!(
        "https://t.me/{}?start=donate_{}",
        bot_username, track_id
    ))?;
    let profile = Url::parse(&format!(
        "https://t.me/{}?start=artist_{}",
        bot_username, artist_id
    ))?;
    Ok(InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::url("❤️ Support Artist (Demo)", donate)],
        vec![InlineKeyboardButton::url("👤 Artist Profile", profile)],
    ]))
}

/// Approve/Reject для админа
pub fn kb_admin_review(submission_id: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("✅ Approve", format!("admin_approve:{}", submission_id)),
        InlineKeyboardButton::callback("❌ Reject", format!("admin_reject:{}", submission_id)),
    ]])
}

/// Карточка подтверждения доната в личке
pub fn kb_donation_confirm(
    donation_id: &str,
    anon_on: bool,
    has_note: bool,
) -> InlineKeyboardMarkup {
    let anon_text = if anon_on {
        "🎭 Anonymous: ON"
    } else {
        "🎭 Anonymous: OFF"
    };
    let note_text = if has_note { "💬 Edit note" } else { "💬 Add note" };
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "✅ Confirm (Demo)",
            format!("don_ok:{}", donation_id),
        )],
        vec![
            InlineKeyboardButton::callback(anon_text, format!("don_anon:{}", donation_id)),
            InlineKeyboardButton::callback(note_text, format!("don_note:{}", donation_id)),
        ],
        vec![InlineKeyboardButton::callback(
            "❌ Cancel",
            format!("don_cancel:{}", donation_id),
        )],
    ])
}

/// Действия редактирования профиля
pub fn kb_profile_actions() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "✏️ Edit name",
            "profile:edit:display_name",
        )],
        vec![InlineKeyboardButton::callback(
            "💳 Edit payment link",
            "profile:edit:payment_link",
        )],
        vec![InlineKeyboardButton::callback(
            "🎧 Edit default genre",
            "profile:edit:default_genre",
        )],
        vec![InlineKeyboardButton::callback(
            "📝 Edit bio",
            "profile:edit:bio",
        )],
    ])
}

/// Выбор суммы доната (демо-режим)
pub fn kb_donation_amounts(track_id: &str) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = PRESET_AMOUNTS
        .iter()
        .map(|amount| {
            vec![InlineKeyboardButton::callback(
                format!("💸 {} so'm (Demo)", format_amount(*amount)),
                format!("donamtsel:{}:{}", track_id, amount),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        "✏️ Custom amount (Demo)",
        format!("donamtsel:{}:custom", track_id),
    )]);
    rows.push(vec![InlineKeyboardButton::callback("❌ Cancel", "doncancel")]);
    InlineKeyboardMarkup::new(rows)
}

/// Предложение добавить заметку к донату
pub fn kb_donation_note_options(donation_id: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "✍️ Add message",
            format!("don_note:{}", donation_id),
        )],
        vec![InlineKeyboardButton::callback(
            "➡️ Skip",
            format!("don_skip_note:{}", donation_id),
        )],
    ])
}

/// Выбор видимости доната
pub fn kb_donation_anonymity(donation_id: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "🌟 Donate publicly",
            format!("don_public:{}", donation_id),
        )],
        vec![InlineKeyboardButton::callback(
            "🎭 Donate anonymously",
            format!("don_anon_set:{}", donation_id),
        )],
    ])
}

/// Кнопка поддержки под треком в профиле артиста
pub fn kb_track_support(track_id: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "❤️ Support (Demo)",
        format!("support_track:{}", track_id),
    )]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn callback_data(btn: &InlineKeyboardButton) -> &str {
        match &btn.kind {
            InlineKeyboardButtonKind::CallbackData(data) => data,
            other => panic!("expected callback button, got {:?}", other),
        }
    }

    #[test]
    fn test_kb_genres_layout() {
        let kb = kb_genres("subgenre");
        // 7 жанров по 2 в ряд: 2+2+2+1, плюс ряд отмены
        assert_eq!(kb.inline_keyboard.len(), 5);
        assert_eq!(kb.inline_keyboard[0].len(), 2);
        assert_eq!(kb.inline_keyboard[3].len(), 1);
        assert_eq!(callback_data(&kb.inline_keyboard[0][0]), "subgenre:Pop");
        assert_eq!(
            callback_data(&kb.inline_keyboard[4][0]),
            "subgenre:CANCEL"
        );
    }

    #[test]
    fn test_kb_admin_review_data() {
        let kb = kb_admin_review("sub_0123456789");
        assert_eq!(
            callback_data(&kb.inline_keyboard[0][0]),
            "admin_approve:sub_0123456789"
        );
        assert_eq!(
            callback_data(&kb.inline_keyboard[0][1]),
            "admin_reject:sub_0123456789"
        );
    }

    #[test]
    fn test_kb_donation_amounts_presets() {
        let kb = kb_donation_amounts("trk_ab12cd34ef");
        assert_eq!(kb.inline_keyboard.len(), PRESET_AMOUNTS.len() + 2);
        assert_eq!(
            callback_data(&kb.inline_keyboard[0][0]),
            "donamtsel:trk_ab12cd34ef:5000"
        );
        assert_eq!(
            callback_data(&kb.inline_keyboard[3][0]),
            "donamtsel:trk_ab12cd34ef:custom"
        );
        assert_eq!(callback_data(&kb.inline_keyboard[4][0]), "doncancel");
    }

    #[test]
    fn test_kb_track_post_urls() {
        let kb = kb_track_post("trk_1", "art_1", "sado_music_bot").unwrap();
        match &kb.inline_keyboard[0][0].kind {
            InlineKeyboardButtonKind::Url(url) => {
                assert_eq!(
                    url.as_str(),
                    "https://t.me/sado_music_bot?start=donate_trk_1"
                );
            }
            other => panic!("expected url button, got {:?}", other),
        }
    }

    #[test]
    fn test_kb_donation_confirm_toggles() {
        let kb = kb_donation_confirm("don_1", true, false);
        assert_eq!(kb.inline_keyboard[1][0].text, "🎭 Anonymous: ON");
        assert_eq!(kb.inline_keyboard[1][1].text, "💬 Add note");
        let kb = kb_donation_confirm("don_1", false, true);
        assert_eq!(kb.inline_keyboard[1][0].text, "🎭 Anonymous: OFF");
        assert_eq!(kb.inline_keyboard[1][1].text, "💬 Edit note");
    }
}
