// src/i18n.rs

//! Тексты интерфейса на двух языках (узбекский по умолчанию, русский).
//! Статические фразы — через `t(lang, phrase)`, параметризованные —
//! отдельными функциями ниже. Все тексты в HTML-разметке.

use crate::models::{Genre, Lang};

/// Ключи статических фраз
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    WelcomeBack,
    WelcomeNew,
    SelectLanguage,
    LanguageSaved,
    InvalidLanguage,
    TrackNotFound,
    ArtistNotFound,
    TrackInactive,
    NoProfile,
    SessionExpired,
    Updated,
    EditNamePrompt,
    EditPaymentPrompt,
    EditBioPrompt,
    ChooseGenre,
    OnboardStart,
    NameTooShort,
    PaymentPrompt,
    InvalidUrl,
    GenrePrompt,
    BioPrompt,
    ProfileCreated,
    SendTitle,
    TitleTooShort,
    CaptionPrompt,
    SomethingWrong,
    Cancelled,
    NothingToCancel,
    HelpText,
}

pub fn t(lang: Lang, phrase: Phrase) -> &'static str {
    use Phrase::*;
    match (phrase, lang) {
        (WelcomeBack, Lang::Uz) => "✅ Xush kelibsiz!\n\n• /submit — yangi trek yuklash\n• /profile — profilingizni ko'rish/tahrirlash\n• /language — tilni o'zgartirish\n• /cancel — bekor qilish",
        (WelcomeBack, Lang::Ru) => "✅ С возвращением!\n\n• /submit — загрузить новый трек\n• /profile — просмотр/редактирование профиля\n• /language — сменить язык\n• /cancel — отмена",

        (WelcomeNew, Lang::Uz) => "🎵 <b>Sado Music</b>ga xush kelibsiz!\n\nMusiqangizni dunyo bilan baham ko'ring.\n\nTilni tanlang / Выберите язык:",
        (WelcomeNew, Lang::Ru) => "🎵 Добро пожаловать в <b>Sado Music</b>!\n\nДелитесь своей музыкой с миром.\n\nTilni tanlang / Выберите язык:",

        (SelectLanguage, _) => "🌐 Tilni tanlang / Выберите язык:",

        (LanguageSaved, Lang::Uz) => "✅ Til saqlandi!",
        (LanguageSaved, Lang::Ru) => "✅ Язык сохранён!",

        (InvalidLanguage, Lang::Uz) => "Noto'g'ri til",
        (InvalidLanguage, Lang::Ru) => "Неверный язык",

        (TrackNotFound, Lang::Uz) => "❌ Trek topilmadi.",
        (TrackNotFound, Lang::Ru) => "❌ Трек не найден.",

        (ArtistNotFound, Lang::Uz) => "❌ Ijrochi topilmadi.",
        (ArtistNotFound, Lang::Ru) => "❌ Артист не найден.",

        (TrackInactive, Lang::Uz) => "❌ Trek endi faol emas.",
        (TrackInactive, Lang::Ru) => "❌ Трек больше не активен.",

        (NoProfile, Lang::Uz) => "Profil topilmadi. Avval /submit bosing.",
        (NoProfile, Lang::Ru) => "Профиль не найден. Сначала нажмите /submit.",

        (SessionExpired, Lang::Uz) => "Sessiya tugadi. Qaytadan urinib ko'ring.",
        (SessionExpired, Lang::Ru) => "Сессия истекла. Попробуйте снова.",

        (Updated, Lang::Uz) => "✅ Yangilandi!",
        (Updated, Lang::Ru) => "✅ Обновлено!",

        (EditNamePrompt, Lang::Uz) => "Yangi ijrochi ismingizni yuboring:",
        (EditNamePrompt, Lang::Ru) => "Отправьте новое имя артиста:",

        (EditPaymentPrompt, Lang::Uz) => "Yangi to'lov havolasini yuboring (Click/Payme URL):",
        (EditPaymentPrompt, Lang::Ru) => "Отправьте новую ссылку для оплаты (Click/Payme URL):",

        (EditBioPrompt, Lang::Uz) => "Yangi bio yuboring ('-' tozalash uchun):",
        (EditBioPrompt, Lang::Ru) => "Отправьте новое био ('-' чтобы очистить):",

        (ChooseGenre, Lang::Uz) => "Janrni tanlang:",
        (ChooseGenre, Lang::Ru) => "Выберите жанр:",

        (OnboardStart, Lang::Uz) => "🎤 <b>Profil yaratish</b>\n\nIjrochi/sahna ismingizni yuboring:",
        (OnboardStart, Lang::Ru) => "🎤 <b>Создание профиля</b>\n\nОтправьте ваше сценическое имя:",

        (NameTooShort, Lang::Uz) => "Ism juda qisqa. Qaytadan urinib ko'ring:",
        (NameTooShort, Lang::Ru) => "Имя слишком короткое. Попробуйте ещё:",

        (PaymentPrompt, Lang::Uz) => "To'lov havolasini yuboring (Click/Payme URL):\n\n<i>Muxlislar shu yerga pul yuboradi.</i>",
        (PaymentPrompt, Lang::Ru) => "Отправьте ссылку для оплаты (Click/Payme URL):\n\n<i>Сюда фанаты будут отправлять донаты.</i>",

        (InvalidUrl, Lang::Uz) => "Iltimos, http:// yoki https:// bilan boshlanadigan havola yuboring",
        (InvalidUrl, Lang::Ru) => "Пожалуйста, отправьте ссылку начинающуюся с http:// или https://",

        (GenrePrompt, Lang::Uz) => "Standart janringizni tanlang:",
        (GenrePrompt, Lang::Ru) => "Выберите жанр по умолчанию:",

        (BioPrompt, Lang::Uz) => "Ixtiyoriy: qisqa bio yuboring (1-2 qator), yoki '-' o'tkazib yuborish uchun.",
        (BioPrompt, Lang::Ru) => "Опционально: отправьте короткое био (1-2 строки), или '-' чтобы пропустить.",

        (ProfileCreated, Lang::Uz) => "✅ Profil yaratildi!\n\nEndi audio faylingizni yuboring (Musiqa/Audio format).",
        (ProfileCreated, Lang::Ru) => "✅ Профиль создан!\n\nТеперь отправьте аудиофайл (формат Музыка/Аудио).",

        (SendTitle, Lang::Uz) => "Trek nomini yuboring:",
        (SendTitle, Lang::Ru) => "Отправьте название трека:",

        (TitleTooShort, Lang::Uz) => "Nom juda qisqa. Qaytadan urinib ko'ring:",
        (TitleTooShort, Lang::Ru) => "Название слишком короткое. Ещё раз:",

        (CaptionPrompt, Lang::Uz) => "Ixtiyoriy: qisqa tavsif yuboring, yoki '-' o'tkazib yuborish uchun.",
        (CaptionPrompt, Lang::Ru) => "Опционально: отправьте короткое описание, или '-' чтобы пропустить.",

        (SomethingWrong, Lang::Uz) => "Xatolik yuz berdi. /submit qaytadan bosing.",
        (SomethingWrong, Lang::Ru) => "Что-то пошло не так. Нажмите /submit снова.",

        (Cancelled, Lang::Uz) => "Bekor qilindi.",
        (Cancelled, Lang::Ru) => "Отменено.",

        (NothingToCancel, Lang::Uz) => "Bekor qiladigan narsa yo'q.",
        (NothingToCancel, Lang::Ru) => "Нечего отменять.",

        (HelpText, Lang::Uz) => "🎵 <b>Sado Music Bot - Yordam</b>\n\n<b>Asosiy buyruqlar:</b>\n• /start — Botni ishga tushirish\n• /help — Bu yordam xabari\n\n<b>Ijrochilar uchun:</b>\n• /submit — Yangi trek yuborish\n• /profile — Profil ko'rish/tahrirlash\n\n<b>Boshqa:</b>\n• /language — Tilni o'zgartirish\n• /cancel — Bekor qilish\n• /chatid — Chat ID olish\n\n<i>Donat tugmalari hozircha Demo rejimida.</i>",
        (HelpText, Lang::Ru) => "🎵 <b>Sado Music Bot - Помощь</b>\n\n<b>Основные команды:</b>\n• /start — Запустить бота\n• /help — Это сообщение помощи\n\n<b>Для артистов:</b>\n• /submit — Загрузить новый трек\n• /profile — Просмотр/редактирование профиля\n\n<b>Прочее:</b>\n• /language — Сменить язык\n• /cancel — Отменить текущую операцию\n• /chatid — Получить ID чата\n\n<i>Кнопки донатов пока в демо-режиме.</i>",
    }
}

// --- Параметризованные сообщения ---

pub fn uploading_as(lang: Lang, name: &str) -> String {
    match lang {
        Lang::Uz => format!(
            "Yuklanyapti: <b>{}</b>\n\nAudio faylingizni yuboring (Musiqa/Audio format).",
            name
        ),
        Lang::Ru => format!(
            "Загрузка от: <b>{}</b>\n\nОтправьте аудиофайл (формат Музыка/Аудио).",
            name
        ),
    }
}

pub fn choose_genre_default(lang: Lang, genre: Genre) -> String {
    match lang {
        Lang::Uz => format!("Janrni tanlang (standart: {}):", genre.as_str()),
        Lang::Ru => format!("Выберите жанр (по умолчанию: {}):", genre.as_str()),
    }
}

pub fn submission_received(lang: Lang, title: &str, submission_id: &str) -> String {
    match lang {
        Lang::Uz => format!(
            "✅ <b>Trek qabul qilindi!</b>\n\n<b>{}</b> trekingiz ko'rib chiqish uchun yuborildi.\nTasdiqlangach xabar beramiz.\n\nYuborish ID: <code>{}</code>",
            title, submission_id
        ),
        Lang::Ru => format!(
            "✅ <b>Трек получен!</b>\n\nВаш трек <b>{}</b> отправлен на модерацию.\nВы получите уведомление после одобрения.\n\nID отправки: <code>{}</code>",
            title, submission_id
        ),
    }
}

pub fn submission_failed(lang: Lang, error: &str) -> String {
    match lang {
        Lang::Uz => format!("❌ Yuborishda xatolik: {}", error),
        Lang::Ru => format!("❌ Ошибка отправки: {}", error),
    }
}

pub fn submitter_approved(lang: Lang, title: &str) -> String {
    match lang {
        Lang::Uz => format!("✅ <b>{}</b> trekingiz tasdiqlandi va joylandi!", title),
        Lang::Ru => format!("✅ Ваш трек <b>{}</b> одобрен и опубликован!", title),
    }
}

pub fn submitter_rejected(lang: Lang, title: &str) -> String {
    match lang {
        Lang::Uz => format!(
            "❌ <b>{}</b> trekingiz tasdiqlanmadi.\n\nIltimos, qoidalarga rioya qiling va qaytadan urinib ko'ring.",
            title
        ),
        Lang::Ru => format!(
            "❌ Ваш трек <b>{}</b> не был одобрен.\n\nПожалуйста, убедитесь что отправка соответствует правилам и попробуйте снова.",
            title
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PHRASES: [Phrase; 29] = [
        Phrase::WelcomeBack,
        Phrase::WelcomeNew,
        Phrase::SelectLanguage,
        Phrase::LanguageSaved,
        Phrase::InvalidLanguage,
        Phrase::TrackNotFound,
        Phrase::ArtistNotFound,
        Phrase::TrackInactive,
        Phrase::NoProfile,
        Phrase::SessionExpired,
        Phrase::Updated,
        Phrase::EditNamePrompt,
        Phrase::EditPaymentPrompt,
        Phrase::EditBioPrompt,
        Phrase::ChooseGenre,
        Phrase::OnboardStart,
        Phrase::NameTooShort,
        Phrase::PaymentPrompt,
        Phrase::InvalidUrl,
        Phrase::GenrePrompt,
        Phrase::BioPrompt,
        Phrase::ProfileCreated,
        Phrase::SendTitle,
        Phrase::TitleTooShort,
        Phrase::CaptionPrompt,
        Phrase::SomethingWrong,
        Phrase::Cancelled,
        Phrase::NothingToCancel,
        Phrase::HelpText,
    ];

    #[test]
    fn test_all_phrases_nonempty() {
        for p in ALL_PHRASES {
            assert!(!t(Lang::Uz, p).is_empty(), "empty uz phrase: {:?}", p);
            assert!(!t(Lang::Ru, p).is_empty(), "empty ru phrase: {:?}", p);
        }
    }

    #[test]
    fn test_languages_differ() {
        // Общие фразы (select_language) совпадают, остальные переведены
        assert_ne!(
            t(Lang::Uz, Phrase::WelcomeBack),
            t(Lang::Ru, Phrase::WelcomeBack)
        );
        assert_eq!(
            t(Lang::Uz, Phrase::SelectLanguage),
            t(Lang::Ru, Phrase::SelectLanguage)
        );
    }

    #[test]
    fn test_parameterized_include_args() {
        let msg = submission_received(Lang::Ru, "Bahor", "sub_0123456789");
        assert!(msg.contains("Bahor"));
        assert!(msg.contains("sub_0123456789"));

        let msg = submitter_approved(Lang::Uz, "Bahor");
        assert!(msg.contains("Bahor"));

        let msg = choose_genre_default(Lang::Uz, Genre::HipHop);
        assert!(msg.contains("Hip Hop"));
    }
}
