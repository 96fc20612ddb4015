use std::sync::Arc;
use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use log::{info, warn};

use crate::db;
use crate::models::AppConfig;
use crate::ninja::Alert;

pub fn spawn_alert_poller(
    config: Arc<AppConfig>,
    start_cursor: i64,
    cancel_token: CancellationToken,
    tx: mpsc::Sender<Alert>,
) -> JoinHandle<Result<()>> {
    info!(
        "⏱ Alert poller started (every {}s, cursor {})",
        config.poll_interval_s, start_cursor
    );

    tokio::spawn(async move { run_poll_loop(config, start_cursor, cancel_token, tx).await })
}

/// Single-flight discipline: one fetch at a time, the next tick waits for
/// the previous cycle, so watermark writes cannot reorder.
async fn run_poll_loop(
    config: Arc<AppConfig>,
    mut cursor: i64,
    cancel_token: CancellationToken,
    tx: mpsc::Sender<Alert>,
) -> Result<()> {
    let mut ticker = interval(Duration::from_secs(config.poll_interval_s));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                cursor = poll_once(&config, cursor, &tx).await?;
            }
            _ = cancel_token.cancelled() => {
                info!("Alert poller cancelled.");
                return Ok(());
            }
        }
    }
}

/// One poll cycle: fetch everything past the watermark, hand each alert to
/// the notification processor, then advance the watermark to the batch
/// maximum. Transport and store failures bubble up and kill the process.
pub(crate) async fn poll_once(
    config: &AppConfig,
    cursor: i64,
    tx: &mpsc::Sender<Alert>,
) -> Result<i64> {
    info!("Requesting latest alerts from the monitoring API (cursor {})", cursor);
    let alerts = config.ninja.alerts_since(cursor).await?;

    if alerts.is_empty() {
        return Ok(cursor);
    }

    let latest = latest_alert_id(&alerts).unwrap_or(cursor);
    info!("Latest alert id from received data: {}", latest);

    // Every alert in the batch is posted, even ones at or below the old
    // watermark; the `since` filter is the only dedup.
    for alert in alerts {
        if tx.send(alert).await.is_err() {
            warn!("Notification channel closed, dropping remaining alerts");
            break;
        }
    }

    let next = cursor.max(latest);
    db::cursor::set_cursor(&config.db, next)
        .await
        .context("Failed to persist alert cursor")?;

    Ok(next)
}

/// Batches are not ordered upstream; a full scan is required.
pub(crate) fn latest_alert_id(alerts: &[Alert]) -> Option<i64> {
    alerts.iter().map(|a| a.id).max()
}
