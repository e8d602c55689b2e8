// src/utils.rs

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("Failed to compile link regex"));
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile ws regex"));

/// Максимальная длина заметки к донату
pub const NOTE_MAX_LEN: usize = 120;

/// Идентификатор вида `art_3f2a9c1b04` — префикс плюс 10 hex-символов.
pub fn new_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &hex[..10])
}

/// Сумма с пробелом-разделителем тысяч: 25000 -> "25 000".
pub fn format_amount(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let rem = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && i % 3 == rem {
            out.push(' ');
        }
        out.push(ch);
    }
    if amount < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Чистка заметки пользователя: убираем ссылки, схлопываем пробелы,
/// обрезаем до NOTE_MAX_LEN символов. Пустой результат — None.
pub fn clean_note(text: &str) -> Option<String> {
    let no_links = LINK_RE.replace_all(text, "");
    let collapsed = WS_RE.replace_all(no_links.trim(), " ");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(NOTE_MAX_LEN).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_shape() {
        let id = new_id("don");
        assert!(id.starts_with("don_"));
        assert_eq!(id.len(), "don_".len() + 10);
        assert_ne!(new_id("don"), new_id("don"));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(500), "500");
        assert_eq!(format_amount(5000), "5 000");
        assert_eq!(format_amount(25000), "25 000");
        assert_eq!(format_amount(1000000), "1 000 000");
    }

    #[test]
    fn test_clean_note_strips_links() {
        let note = clean_note("check https://spam.example/x this   out").unwrap();
        assert_eq!(note, "check this out");
    }

    #[test]
    fn test_clean_note_empty_after_cleanup() {
        assert_eq!(clean_note("   https://only.link/here   "), None);
        assert_eq!(clean_note(""), None);
    }

    #[test]
    fn test_clean_note_caps_length() {
        let long = "a".repeat(500);
        assert_eq!(clean_note(&long).unwrap().chars().count(), NOTE_MAX_LEN);
    }
}
