// src/router/admin.rs

//! Админский роутер: одобрение и отклонение заявок. Доступен только
//! пользователю из cfg.admin_id; решение возможно, пока заявка PENDING.

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, FileId, InputFile, MaybeInaccessibleMessage, ParseMode};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::i18n;
use crate::keyboards::kb_track_post;
use crate::models::{Genre, NewTrack, SubmissionStatus};
use crate::storage::{self, Db};
use crate::texts;
use crate::utils::new_id;

pub async fn handle_callback(
    bot: &Bot,
    q: &CallbackQuery,
    data: &str,
    cfg: &Config,
    db: &Db,
) -> anyhow::Result<()> {
    if q.from.id.0 as i64 != cfg.admin_id {
        bot.answer_callback_query(q.id.clone())
            .text("You're not authorized.")
            .show_alert(true)
            .await?;
        return Ok(());
    }

    let Some((action, submission_id)) = data.split_once(':') else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    let Some(MaybeInaccessibleMessage::Regular(message)) = q.message.as_ref() else {
        let _ = bot.answer_callback_query(q.id.clone()).await;
        return Ok(());
    };

    match action {
        "admin_approve" => approve(bot, q, message, submission_id, cfg, db).await,
        "admin_reject" => reject(bot, q, message, submission_id, db).await,
        _ => {
            warn!("Received unknown admin callback data: {}", data);
            bot.answer_callback_query(q.id.clone()).await?;
            Ok(())
        }
    }
}

/// Дописывает вердикт в подпись сообщения с заявкой у админа.
async fn append_admin_caption(bot: &Bot, message: &Message, extra: &str) {
    let base = message.caption().unwrap_or("");
    if let Err(e) = bot
        .edit_message_caption(message.chat.id, message.id)
        .caption(format!("{}\n\n{}", base, extra))
        .parse_mode(ParseMode::Html)
        .await
    {
        warn!("Failed to edit admin message caption: {}", e);
    }
}

/// Одобрение: пост в канал жанра, якорь в обсуждениях, запись трека,
/// перевод заявки в APPROVED, уведомление отправителя.
async fn approve(
    bot: &Bot,
    q: &CallbackQuery,
    message: &Message,
    submission_id: &str,
    cfg: &Config,
    db: &Db,
) -> anyhow::Result<()> {
    let Some(submission) = storage::get_submission(db, submission_id).await? else {
        bot.answer_callback_query(q.id.clone())
            .text("Submission not found.")
            .show_alert(true)
            .await?;
        return Ok(());
    };
    if submission.status != SubmissionStatus::Pending.as_str() {
        bot.answer_callback_query(q.id.clone())
            .text(format!("Already {}.", submission.status))
            .show_alert(true)
            .await?;
        return Ok(());
    }
    let Some(artist) = storage::get_artist(db, &submission.artist_id).await? else {
        bot.answer_callback_query(q.id.clone())
            .text("Artist not found.")
            .show_alert(true)
            .await?;
        return Ok(());
    };
    let Some(genre) = Genre::parse(&submission.genre) else {
        bot.answer_callback_query(q.id.clone())
            .text(format!("Unknown genre: {}", submission.genre))
            .show_alert(true)
            .await?;
        return Ok(());
    };

    let Some(channel) = cfg.channel_for_genre(genre) else {
        append_admin_caption(
            bot,
            message,
            &format!("❌ No channel configured for genre: {}", submission.genre),
        )
        .await;
        bot.answer_callback_query(q.id.clone())
            .text("Channel not configured for this genre.")
            .show_alert(true)
            .await?;
        return Ok(());
    };

    let track_id = new_id("trk");
    let post_caption = texts::track_caption_with_payment(
        &submission.title,
        &artist.display_name,
        artist.payment_link.as_deref(),
        submission.caption.as_deref(),
    );
    let kb = kb_track_post(&track_id, &artist.artist_id, &cfg.bot_username)?;

    // 1) Пост в канал жанра
    let ch_msg = match bot
        .send_audio(
            channel,
            InputFile::file_id(FileId(submission.telegram_file_id.clone())),
        )
        .caption(post_caption.clone())
        .parse_mode(ParseMode::Html)
        .reply_markup(kb)
        .await
    {
        Ok(m) => m,
        Err(e) => {
            error!("Failed to post approved track: {}", e);
            append_admin_caption(bot, message, &format!("❌ Failed to post: {}", e)).await;
            bot.answer_callback_query(q.id.clone())
                .text(format!("Failed: {}", e))
                .show_alert(true)
                .await?;
            return Ok(());
        }
    };
    info!("Posted track {} for submission {}", track_id, submission_id);

    // 2) Якорь в группе обсуждений (для благодарностей под донаты)
    let mut disc_anchor_id: i64 = 0;
    if let Some(discussion) = cfg.discussion_for_genre(genre) {
        match bot
            .send_message(discussion, format!("🧵 Comments for:\n{}", post_caption))
            .parse_mode(ParseMode::Html)
            .await
        {
            Ok(m) => {
                disc_anchor_id = m.id.0 as i64;
                info!("Created discussion anchor {} for track {}", disc_anchor_id, track_id);
            }
            Err(e) => warn!("Failed to create discussion anchor: {}", e),
        }
    }

    // 3) Запись трека и перевод заявки в APPROVED
    storage::insert_track(
        db,
        &NewTrack {
            track_id: track_id.clone(),
            artist_id: submission.artist_id.clone(),
            title: submission.title.clone(),
            genre,
            caption: submission.caption.clone(),
            telegram_file_id: Some(submission.telegram_file_id.clone()),
            channel_message_id: ch_msg.id.0 as i64,
            discussion_anchor_message_id: disc_anchor_id,
        },
    )
    .await?;
    storage::set_submission_status(db, submission_id, SubmissionStatus::Approved).await?;

    // 4) Вердикт в сообщении админа
    append_admin_caption(
        bot,
        message,
        &format!("✅ <b>APPROVED</b>\nTrack ID: <code>{}</code>", track_id),
    )
    .await;

    // 5) Уведомляем отправителя на его языке
    let submitter_lang = storage::get_lang(db, submission.submitter_user_id).await?;
    if let Err(e) = bot
        .send_message(
            ChatId(submission.submitter_user_id),
            i18n::submitter_approved(submitter_lang, &submission.title),
        )
        .parse_mode(ParseMode::Html)
        .await
    {
        warn!("Failed to notify submitter: {}", e);
    }

    bot.answer_callback_query(q.id.clone())
        .text("✅ Approved and posted!")
        .await?;
    info!("Approved submission {} -> track {}", submission_id, track_id);
    Ok(())
}

/// Отклонение: перевод заявки в REJECTED и уведомление отправителя.
async fn reject(
    bot: &Bot,
    q: &CallbackQuery,
    message: &Message,
    submission_id: &str,
    db: &Db,
) -> anyhow::Result<()> {
    let Some(submission) = storage::get_submission(db, submission_id).await? else {
        bot.answer_callback_query(q.id.clone())
            .text("Submission not found.")
            .show_alert(true)
            .await?;
        return Ok(());
    };
    if submission.status != SubmissionStatus::Pending.as_str() {
        bot.answer_callback_query(q.id.clone())
            .text(format!("Already {}.", submission.status))
            .show_alert(true)
            .await?;
        return Ok(());
    }

    storage::set_submission_status(db, submission_id, SubmissionStatus::Rejected).await?;
    append_admin_caption(bot, message, "❌ <b>REJECTED</b>").await;

    let submitter_lang = storage::get_lang(db, submission.submitter_user_id).await?;
    if let Err(e) = bot
        .send_message(
            ChatId(submission.submitter_user_id),
            i18n::submitter_rejected(submitter_lang, &submission.title),
        )
        .parse_mode(ParseMode::Html)
        .await
    {
        warn!("Failed to notify submitter: {}", e);
    }

    bot.answer_callback_query(q.id.clone()).text("❌ Rejected").await?;
    info!("Rejected submission {}", submission_id);
    Ok(())
}
