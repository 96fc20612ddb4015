use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use teloxide::dispatching::Dispatcher;
use teloxide::dptree;

extern crate pretty_env_logger;
#[macro_use] extern crate log;

use crate::config::EnvConfig;
use crate::models::AppConfig;

mod db;
mod models;
mod ninja;
mod freshservice;
mod config;
mod core;
mod bot;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let cancel_token = CancellationToken::new();
    let main_cancel_token = cancel_token.clone();

    info!("🚀 Starting alert bridge.");

    let env = EnvConfig::load()
        .context("Error reading env variables.")?
        .validate()
        .context("Error checking env variables.")?;

    let db_pool = db::init(&env.db_url(), env.migrations.to_str().context("Migrations path is not valid UTF-8")?)
        .await
        .context("Error initializing database pool.")?;

    // The watermark must be readable before the first poll; a dead store at
    // boot is fatal and supervision restarts us.
    let start_cursor = db::cursor::get_cursor(&db_pool)
        .await
        .context("Error reading alert cursor at startup.")?;

    let ninja = Arc::new(ninja::init(
        env.ninja_host.clone(),
        env.ninja_access_key_id.clone(),
        env.ninja_secret.clone(),
    ));
    let freshservice = Arc::new(freshservice::init(
        env.freshservice_host.clone(),
        env.freshservice_api_key.clone(),
    ));

    let app_config = Arc::new(AppConfig {
        ninja,
        freshservice,
        db: db_pool,
        alert_chat: env.alert_chat,
        display_tz: env.display_tz,
        poll_interval_s: env.poll_interval_s,
    });

    let bot = bot::init(env.bot_token.clone());

    let (tx, rx) = mpsc::channel::<ninja::Alert>(100);
    let poller = core::spawn_alert_poller(app_config.clone(), start_cursor, cancel_token.clone(), tx);
    core::spawn_notification_processor(rx, bot.clone(), app_config.clone(), cancel_token.clone());

    info!("✅ Run Dispatcher...");

    tokio::spawn(async move {
        // Wait Ctrl+C or SIGTERM Docker/OS
        tokio::signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
        info!("Received SIGTERM");
        main_cancel_token.cancel();
    });

    let mut dispatcher = Dispatcher::builder(bot, bot::schema())
        .dependencies(dptree::deps![app_config.clone()])
        .enable_ctrlc_handler()
        .build();

    let bot_task = dispatcher.dispatch();

    tokio::select! {
        _ = bot_task => info!("Bot task completed successfully."),
        res = poller => {
            // A poll failure is fatal for the whole process: exit non-zero
            // and restart from the persisted cursor.
            res.context("Alert poller panicked")??;
            info!("Alert poller stopped.");
        }
        _ = cancel_token.cancelled() => info!("Bot task was canceled."),
    }

    info!("Graceful Shutdown...");

    app_config.db.close().await;

    info!("Database connection closed.");
    Ok(())
}
