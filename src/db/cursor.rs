use anyhow::Result;
use sqlx::SqlitePool;
use log::warn;

/// The watermark lives in a single fixed-key row.
const CURSOR_KEY: i64 = 1;

/// Highest alert id already posted to the chat. A missing or non-positive
/// record means "start from the beginning"; a DB error is for the caller to
/// treat as fatal.
pub async fn get_cursor(pool: &SqlitePool) -> Result<i64> {
    let stored: Option<i64> = sqlx::query_scalar("SELECT latest_alert FROM alert_cursor WHERE id = ?")
        .bind(CURSOR_KEY)
        .fetch_optional(pool)
        .await?;

    match stored {
        Some(latest) if latest > 0 => Ok(latest),
        _ => {
            warn!("⚠️ Stored alert cursor is missing or bad. Setting to 0.");
            Ok(0)
        }
    }
}

/// Last-write-wins upsert on the fixed key; safe under concurrent writers.
pub async fn set_cursor(pool: &SqlitePool, latest: i64) -> Result<()> {
    sqlx::query(
        "INSERT INTO alert_cursor (id, latest_alert) VALUES (?, ?) \
         ON CONFLICT(id) DO UPDATE SET latest_alert = excluded.latest_alert",
    )
    .bind(CURSOR_KEY)
    .bind(latest)
    .execute(pool)
    .await?;

    Ok(())
}
