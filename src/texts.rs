// src/texts.rs

//! Шаблоны «карточек» — подписи к постам в каналах, карточка доната,
//! публичная благодарность, личные уведомления. Эти тексты не зависят
//! от языка пользователя (каналы ведутся на одном языке).

use crate::utils::format_amount;

/// Подпись трека в канале с необязательной ссылкой на оплату и описанием.
pub fn track_caption_with_payment(
    title: &str,
    artist_name: &str,
    payment_link: Option<&str>,
    caption: Option<&str>,
) -> String {
    let mut text = format!("🎵 <b>{}</b>\n🎤 {}\n", title, artist_name);
    if let Some(c) = caption {
        text.push_str(&format!("\n{}\n", c));
    }
    if let Some(link) = payment_link {
        text.push_str(&format!("\n💳 Support: {}", link));
    }
    text
}

/// Карточка подтверждения доната в личке.
pub fn donation_dm_card(
    track_title: &str,
    artist_name: &str,
    amount: i64,
    anon: bool,
    note: Option<&str>,
) -> String {
    format!(
        "💸 <b>Donation Confirmation</b> — <i>Demo Mode</i>\n\n\
         Amount: <b>{} so'm</b>\n\
         To: <b>{}</b>\n\
         Track: <i>{}</i>\n\
         Anonymous: <b>{}</b>\n\
         Note: <i>{}</i>\n\n\
         ⚠️ <i>Payment integration coming soon. No real payment will be processed.</i>",
        format_amount(amount),
        artist_name,
        track_title,
        if anon { "ON" } else { "OFF" },
        note.unwrap_or("(none)"),
    )
}

/// Публичная благодарность в группе обсуждений.
pub fn appreciation_public(
    donor_public: &str,
    amount: i64,
    artist_name: &str,
    track_title: &str,
    note: Option<&str>,
) -> String {
    let mut msg = format!(
        "❤️ <b>{}</b> donated <b>{} so'm</b> to <b>{}</b> (Demo)\n🎵 <i>{}</i>",
        donor_public,
        format_amount(amount),
        artist_name,
        track_title,
    );
    if let Some(n) = note {
        msg.push_str(&format!("\n💬 \"{}\"", n));
    }
    msg
}

/// Личное уведомление артисту о донате.
pub fn creator_dm(
    is_anon: bool,
    donor_name: Option<&str>,
    donor_username: Option<&str>,
    amount: i64,
    track_title: &str,
    note: Option<&str>,
) -> String {
    let amount_str = format_amount(amount);
    let mut msg = if is_anon {
        format!(
            "You received an anonymous donation 💸 (Demo)\nAmount: <b>{} so'm</b>\nTrack: <i>{}</i>",
            amount_str, track_title,
        )
    } else {
        let uname = donor_username
            .map(|u| format!(" (@{})", u))
            .unwrap_or_default();
        format!(
            "You received a donation 💸 (Demo)\nAmount: <b>{} so'm</b>\nFrom: <b>{}</b>{}\nTrack: <i>{}</i>",
            amount_str,
            donor_name.unwrap_or("Unknown"),
            uname,
            track_title,
        )
    };
    if let Some(n) = note {
        msg.push_str(&format!("\nNote: \"{}\"", n));
    }
    msg
}

/// Публичный профиль артиста со списком треков.
pub fn artist_profile_text(
    artist_name: &str,
    bio: Option<&str>,
    total_tracks: i64,
    tracks: &[(String, String)], // (title, genre)
) -> String {
    let mut text = format!("🎤 <b>{}</b>\n\n", artist_name);
    if let Some(b) = bio {
        text.push_str(&format!("📝 {}\n\n", b));
    }
    text.push_str(&format!("🎵 <b>Total tracks:</b> {}\n\n", total_tracks));
    if tracks.is_empty() {
        text.push_str("<i>No tracks yet</i>");
    } else {
        text.push_str("<b>Recent tracks:</b>\n");
        for (title, genre) in tracks {
            text.push_str(&format!("\n🎵 <b>{}</b>\n   Genre: {}\n", title, genre));
        }
    }
    text
}

/// Стартовая карточка донат-диалога.
pub fn donation_start_text(track_title: &str, artist_name: &str) -> String {
    format!(
        "❤️ <b>Support Artist</b> — <i>Demo Mode, Coming Soon</i>\n\n\
         🎵 Track: <i>{}</i>\n\
         🎤 Artist: <b>{}</b>\n\n\
         ⚠️ <i>Payment integration coming soon. This is a demo.</i>\n\n\
         Choose donation amount:",
        track_title, artist_name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_caption_optional_parts() {
        let full = track_caption_with_payment(
            "Bahor",
            "Sado",
            Some("https://payme.uz/sado"),
            Some("first single"),
        );
        assert!(full.contains("Bahor"));
        assert!(full.contains("first single"));
        assert!(full.contains("💳 Support: https://payme.uz/sado"));

        let bare = track_caption_with_payment("Bahor", "Sado", None, None);
        assert!(!bare.contains("💳"));
    }

    #[test]
    fn test_donation_card_amount_and_anon() {
        let card = donation_dm_card("Bahor", "Sado", 25000, true, None);
        assert!(card.contains("25 000 so'm"));
        assert!(card.contains("Anonymous: <b>ON</b>"));
        assert!(card.contains("(none)"));
    }

    #[test]
    fn test_appreciation_with_note() {
        let msg = appreciation_public("Someone", 5000, "Sado", "Bahor", Some("good luck"));
        assert!(msg.contains("Someone"));
        assert!(msg.contains("5 000 so'm"));
        assert!(msg.contains("💬 \"good luck\""));
    }

    #[test]
    fn test_creator_dm_anonymity() {
        let anon = creator_dm(true, Some("Ali"), Some("ali"), 5000, "Bahor", None);
        assert!(!anon.contains("Ali"));

        let open = creator_dm(false, Some("Ali"), Some("ali"), 5000, "Bahor", None);
        assert!(open.contains("Ali"));
        assert!(open.contains("(@ali)"));
    }

    #[test]
    fn test_profile_text_empty_tracks() {
        let text = artist_profile_text("Sado", None, 0, &[]);
        assert!(text.contains("No tracks yet"));
    }
}
