// src/models.rs

/// Язык интерфейса пользователя. Хранится в user_settings.lang как 'uz'/'ru'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Uz,
    Ru,
}

impl Lang {
    pub fn code(self) -> &'static str {
        match self {
            Lang::Uz => "uz",
            Lang::Ru => "ru",
        }
    }

    pub fn from_code(code: &str) -> Option<Lang> {
        match code {
            "uz" => Some(Lang::Uz),
            "ru" => Some(Lang::Ru),
            _ => None,
        }
    }
}

/// Жанры треков. Текстовое представление совпадает со значениями в БД
/// и в callback-данных клавиатур.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Genre {
    Pop,
    Rock,
    Indie,
    HipHop,
    Rap,
    Electronic,
    Other,
}

pub const GENRES: [Genre; 7] = [
    Genre::Pop,
    Genre::Rock,
    Genre::Indie,
    Genre::HipHop,
    Genre::Rap,
    Genre::Electronic,
    Genre::Other,
];

impl Genre {
    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Pop => "Pop",
            Genre::Rock => "Rock",
            Genre::Indie => "Indie",
            Genre::HipHop => "Hip Hop",
            Genre::Rap => "Rap",
            Genre::Electronic => "Electronic",
            Genre::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Genre> {
        GENRES.iter().copied().find(|g| g.as_str() == s)
    }
}

/// Статус заявки на публикацию трека.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "PENDING",
            SubmissionStatus::Approved => "APPROVED",
            SubmissionStatus::Rejected => "REJECTED",
        }
    }
}

/// Статус опубликованного трека.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackStatus {
    Active,
    Hidden,
}

impl TrackStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackStatus::Active => "ACTIVE",
            TrackStatus::Hidden => "HIDDEN",
        }
    }
}

/// Статус доната.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationStatus {
    Created,
    Confirmed,
    Canceled,
}

impl DonationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DonationStatus::Created => "CREATED",
            DonationStatus::Confirmed => "CONFIRMED",
            DonationStatus::Canceled => "CANCELED",
        }
    }
}

/// Редактируемые поля профиля артиста. Закрытый набор вместо строкового
/// имени колонки, чтобы SQL не собирался из пользовательского ввода.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtistField {
    DisplayName,
    PaymentLink,
    DefaultGenre,
    Bio,
}

impl ArtistField {
    pub fn column(self) -> &'static str {
        match self {
            ArtistField::DisplayName => "display_name",
            ArtistField::PaymentLink => "payment_link",
            ArtistField::DefaultGenre => "default_genre",
            ArtistField::Bio => "bio",
        }
    }

    /// Ключ из callback-данных `profile:edit:<key>`.
    pub fn from_key(key: &str) -> Option<ArtistField> {
        match key {
            "display_name" => Some(ArtistField::DisplayName),
            "payment_link" => Some(ArtistField::PaymentLink),
            "default_genre" => Some(ArtistField::DefaultGenre),
            "bio" => Some(ArtistField::Bio),
            _ => None,
        }
    }
}

/// Новый профиль артиста
#[derive(Debug)]
pub struct NewArtist {
    pub artist_id: String,
    pub tg_user_id: i64,
    pub display_name: String,
    pub payment_link: Option<String>,
    pub profile_url: Option<String>,
    pub default_genre: Option<Genre>,
    pub bio: Option<String>,
}

/// Новая заявка на модерацию
#[derive(Debug)]
pub struct NewSubmission {
    pub submission_id: String,
    pub artist_id: String,
    pub submitter_user_id: i64,
    pub title: String,
    pub genre: Genre,
    pub caption: Option<String>,
    pub telegram_file_id: String,
}

/// Новый опубликованный трек
#[derive(Debug)]
pub struct NewTrack {
    pub track_id: String,
    pub artist_id: String,
    pub title: String,
    pub genre: Genre,
    pub caption: Option<String>,
    pub telegram_file_id: Option<String>,
    pub channel_message_id: i64,
    pub discussion_anchor_message_id: i64,
}

/// Новый донат (создаётся до подтверждения, в статусе CREATED)
#[derive(Debug)]
pub struct NewDonation {
    pub track_id: String,
    pub artist_id: String,
    pub donor_user_id: i64,
    pub donor_name: String,
    pub donor_username: Option<String>,
    pub amount: i64,
    pub is_anonymous: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_roundtrip() {
        for g in GENRES {
            assert_eq!(Genre::parse(g.as_str()), Some(g));
        }
        assert_eq!(Genre::parse("Jazz"), None);
    }

    #[test]
    fn test_lang_codes() {
        assert_eq!(Lang::from_code("ru"), Some(Lang::Ru));
        assert_eq!(Lang::from_code("uz"), Some(Lang::Uz));
        assert_eq!(Lang::from_code("en"), None);
        assert_eq!(Lang::default(), Lang::Uz);
    }

    #[test]
    fn test_artist_field_keys() {
        for f in [
            ArtistField::DisplayName,
            ArtistField::PaymentLink,
            ArtistField::DefaultGenre,
            ArtistField::Bio,
        ] {
            assert_eq!(ArtistField::from_key(f.column()), Some(f));
        }
        assert_eq!(ArtistField::from_key("artist_id"), None);
    }
}
