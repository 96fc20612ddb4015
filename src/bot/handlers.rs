use anyhow::{Context, Result};
use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::MessageEntity;

use crate::bot::models::CallbackAction;
use crate::bot::{utils, view};
use crate::freshservice::TicketRequest;
use crate::models::AppConfig;

/// Button-press dispatcher: one upstream side effect, then an in-place
/// update of the alert message.
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    config: Arc<AppConfig>,
) -> Result<()> {
    // Instantly stop the client-side spinner.
    let _ = bot.answer_callback_query(q.id).await;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    // Foreign or stale payloads are not an error, just not ours to handle.
    let action = match CallbackAction::from_string(data) {
        Ok(action) => action,
        Err(e) => {
            debug!("Ignoring unrecognized callback payload: {}", e);
            return Ok(());
        }
    };

    let msg = q
        .message
        .as_ref()
        .and_then(|m| m.regular_message())
        .context("Original message missing from callback")?;

    let resolver = utils::display_name(&q.from);
    if resolver.is_none() {
        warn!("Could not resolve the name of the button presser");
    }

    match action {
        CallbackAction::Reset { alert_id } => {
            if let Err(e) = config.ninja.reset_alert(alert_id).await {
                error!("Reset of alert {} failed upstream: {}", alert_id, e);
            }

            // The message flips to "reset" regardless of the upstream
            // outcome; the monitoring API offers nothing to re-check.
            append_resolution(&bot, msg, &view::reset_note(resolver.as_deref())).await
        }

        CallbackAction::Ticket { alert_id } => {
            let (subject, description) = view::split_alert_message(msg.text().unwrap_or_default());
            let ticket = TicketRequest::incident(subject, description);

            match config.freshservice.create_ticket(&ticket).await {
                Ok(Some(display_id)) => {
                    info!("Alert {} escalated to ticket {}", alert_id, display_id);
                    let url = config.freshservice.ticket_url(display_id);
                    append_resolution(&bot, msg, &view::ticket_note(resolver.as_deref(), &url)).await
                }
                Ok(None) => {
                    warn!("Helpdesk refused the ticket for alert {}", alert_id);
                    Ok(())
                }
                Err(e) => {
                    error!("Ticket creation for alert {} failed: {}", alert_id, e);
                    Ok(())
                }
            }
        }
    }
}

/// Rewrites the alert message in place: original text and entities stay
/// (appending cannot shift entity offsets), the resolution note lands at
/// the bottom and the action buttons disappear with the markup.
async fn append_resolution(bot: &Bot, msg: &Message, note: &str) -> Result<()> {
    let original = msg.text().unwrap_or_default();
    let entities: Vec<MessageEntity> = msg.entities().map(<[_]>::to_vec).unwrap_or_default();

    let updated = format!("{}\n\n{}", original, note);

    bot.edit_message_text(msg.chat.id, msg.id, updated)
        .entities(entities)
        .await
        .context("Failed to update alert message")?;

    Ok(())
}
