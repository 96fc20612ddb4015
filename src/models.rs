use std::sync::Arc;
use chrono_tz::Tz;
use teloxide::types::ChatId;

use crate::freshservice::FreshserviceClient;
use crate::ninja::NinjaClient;

pub struct AppConfig {
    pub ninja: Arc<NinjaClient>,
    pub freshservice: Arc<FreshserviceClient>,
    pub db: sqlx::SqlitePool,

    pub alert_chat: ChatId,
    pub display_tz: Option<Tz>,
    pub poll_interval_s: u64,
}
