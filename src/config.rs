use std::env;
use std::path::PathBuf;
use anyhow::{anyhow, ensure, Context, Result};
use chrono_tz::Tz;
use log::{info, warn};
use teloxide::types::ChatId;

pub struct EnvConfig {
    pub bot_token: String,
    pub alert_chat: ChatId,
    pub database: PathBuf,
    pub migrations: PathBuf,
    pub ninja_host: String,
    pub ninja_access_key_id: String,
    pub ninja_secret: String,
    pub freshservice_host: String,
    pub freshservice_api_key: String,
    pub poll_interval_s: u64,
    pub display_tz: Option<Tz>,
}

impl EnvConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            bot_token: env::var("BOT_TOKEN").unwrap_or_default(),

            alert_chat: ChatId(
                env::var("ALERT_CHAT_ID")
                    .unwrap_or_default()
                    .parse::<i64>()
                    .unwrap_or(0),
            ),

            database: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "alerts.db".to_string())
                .into(),

            migrations: env::var("MIGRATIONS_PATH")
                .unwrap_or_else(|_| "./migrations".to_string())
                .into(),

            ninja_host: env::var("NINJA_HOST")
                .unwrap_or_else(|_| "https://api.ninjarmm.com".to_string()),

            ninja_access_key_id: env::var("NINJA_ACCESS_KEY_ID").unwrap_or_default(),
            ninja_secret: env::var("NINJA_SECRET").unwrap_or_default(),

            freshservice_host: env::var("FRESHSERVICE_HOST").unwrap_or_default(),
            freshservice_api_key: env::var("FRESHSERVICE_API_KEY").unwrap_or_default(),

            poll_interval_s: match env::var("POLL_INTERVAL_SECS") {
                Ok(raw) => raw
                    .parse::<u64>()
                    .with_context(|| format!("POLL_INTERVAL_SECS is not a number: {}", raw))?,
                Err(_) => 300,
            },

            display_tz: match env::var("DISPLAY_TZ") {
                Ok(name) if !name.is_empty() => Some(
                    name.parse::<Tz>()
                        .map_err(|e| anyhow!("DISPLAY_TZ is not a valid IANA zone: {}", e))?,
                ),
                _ => None,
            },
        })
    }

    pub fn validate(self) -> Result<Self> {
        info!("--- Checking env variables ---");
        info!("🗄 Database: {:?}", self.database);
        info!("🛠 Migrations: {:?}", self.migrations);
        info!("🔗 Monitoring API: {}", self.ninja_host);
        info!("🎫 Helpdesk: {}", self.freshservice_host);
        info!("⏱ Poll interval: {}s", self.poll_interval_s);

        ensure!(!self.bot_token.is_empty(), "Critical Error: BOT_TOKEN not set!");
        ensure!(self.alert_chat.0 != 0, "Critical Error: ALERT_CHAT_ID not set!");
        ensure!(
            !self.ninja_access_key_id.is_empty() && !self.ninja_secret.is_empty(),
            "Critical Error: NINJA_ACCESS_KEY_ID / NINJA_SECRET not set!"
        );
        ensure!(
            !self.freshservice_host.is_empty() && !self.freshservice_api_key.is_empty(),
            "Critical Error: FRESHSERVICE_HOST / FRESHSERVICE_API_KEY not set!"
        );
        ensure!(self.poll_interval_s > 0, "POLL_INTERVAL_SECS must be positive");

        match self.display_tz {
            Some(tz) => info!("🌍 Display timezone: {}", tz),
            None => warn!("DISPLAY_TZ not set, timestamps pass through unconverted"),
        }

        if !self.migrations.exists() {
            warn!("⚠️ Folder migration not found {:?}", self.migrations);
        }

        Ok(self)
    }

    pub fn db_url(&self) -> String {
        format!("sqlite://{}", self.database.to_string_lossy())
    }
}
