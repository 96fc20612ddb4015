use std::sync::Arc;
use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::bot::{keyboards, view};
use crate::models::AppConfig;
use crate::ninja::Alert;

pub fn spawn_notification_processor(
    mut rx: mpsc::Receiver<Alert>,
    bot: Bot,
    config: Arc<AppConfig>,
    cancel_token: CancellationToken,
) {
    info!("Background notification processor started");

    tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(alert) = rx.recv() => {
                    if let Err(e) = post_alert(&bot, &config, alert).await {
                        error!("Failed to post alert notification: {}", e);
                    }
                }
                _ = cancel_token.cancelled() => break,
            }
        }
    });
}

async fn post_alert(bot: &Bot, config: &Arc<AppConfig>, alert: Alert) -> Result<()> {
    info!("Posting alert {} for {}", alert.id, alert.device.display_name);

    let text = view::render_alert(&alert, config.display_tz);
    let kb = keyboards::alert_actions(&alert);

    let sent = bot
        .send_message(config.alert_chat, text)
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(kb.clone())
        .await;

    if let Err(e) = sent {
        // A formatting reject must not swallow the alert; deliver the plain
        // rendering instead.
        warn!("Formatted send rejected ({}), falling back to plain text", e);
        bot.send_message(
            config.alert_chat,
            view::render_alert_fallback(&alert, config.display_tz),
        )
        .reply_markup(kb)
        .await?;
    }

    Ok(())
}
