//! royaltywatch binary: configuration, wiring, and the poll loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use royaltywatch_core::Notifier;
use royaltywatch_notify::TelegramNotifier;
use royaltywatch_social::TwitterClient;
use royaltywatch_store::TrackingStore;
use royaltywatch_watch::{Watcher, WatcherConfig};

#[derive(Parser, Debug)]
#[command(
    name = "royaltywatch",
    version,
    about = "Watches a launch account for royalty-share posts and notifies on beneficiary engagement"
)]
struct Cli {
    /// Bearer token for the social API.
    #[arg(long, env = "TWITTER_BEARER_TOKEN", hide_env_values = true)]
    twitter_bearer_token: String,

    /// Telegram bot token used for notifications.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    telegram_bot_token: String,

    /// Telegram chat id that receives notifications.
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    telegram_chat_id: String,

    /// Handle of the launch account to monitor (leading @ is ignored).
    #[arg(long, env = "LAUNCH_ACCOUNT", default_value = "LaunchOnBags")]
    launch_account: String,

    /// Seconds to sleep between poll cycles.
    #[arg(long, env = "POLL_INTERVAL", default_value_t = 30)]
    poll_interval: u64,

    /// Path of the SQLite tracking database.
    #[arg(long, env = "DB_PATH", default_value = "bot_state.sqlite3")]
    db_path: PathBuf,

    /// Send a single test message to the notification channel and exit.
    #[arg(long)]
    notify_test: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("royaltywatch v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let notifier = TelegramNotifier::new(cli.telegram_bot_token, cli.telegram_chat_id)?;
    if cli.notify_test {
        notifier
            .send("✅ Test message from royaltywatch")
            .await
            .context("sending test notification")?;
        println!("test notification delivered");
        return Ok(());
    }

    let social = TwitterClient::new(cli.twitter_bearer_token)?;
    let store = TrackingStore::open_persistent(&cli.db_path)
        .with_context(|| format!("opening tracking database at {}", cli.db_path.display()))?;
    tracing::info!(
        tracked = store.tracked_count()?,
        db = %cli.db_path.display(),
        "tracking store ready"
    );

    let account = cli.launch_account.trim_start_matches('@').to_string();
    let config = WatcherConfig::new(account, Duration::from_secs(cli.poll_interval));

    // Startup resolution is the one fatal failure mode; past this point
    // the loop absorbs everything.
    let mut watcher =
        Watcher::connect(Arc::new(social), Arc::new(notifier), store, config).await?;
    watcher.run().await;
    Ok(())
}
