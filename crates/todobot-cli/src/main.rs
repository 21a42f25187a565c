mod config;

use clap::{Parser, ValueEnum};
use config::BotConfig;
use std::path::PathBuf;
use std::sync::Arc;
use todobot_channels::TelegramChannel;
use todobot_gateway::{Dispatcher, MessageRouter};
use todobot_session::{MemorySessionStore, SessionStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todobot", about = "Telegram todo list bot")]
struct Cli {
    /// Path to an optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = BotConfig::load(cli.config.as_deref()).await?;
    info!(
        api_base_url = %config.api_base_url,
        poll_timeout_secs = config.poll_timeout_secs,
        max_dice = config.max_dice,
        "Starting todobot"
    );

    let mut telegram =
        TelegramChannel::with_base_url(&config.token, &config.api_base_url, config.event_buffer)
            .poll_timeout(config.poll_timeout())
            .poll_backoff(config.poll_backoff());
    let events = telegram
        .take_event_receiver()
        .ok_or_else(|| anyhow::anyhow!("Telegram event receiver already taken"))?;
    let telegram = Arc::new(telegram);

    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let router = Arc::new(MessageRouter::new(
        telegram.clone(),
        sessions,
        config.router_settings(),
    ));

    let poller = {
        let telegram = telegram.clone();
        tokio::spawn(async move { telegram.poll_updates().await })
    };

    let handled = Dispatcher::new(router).run(events, shutdown_signal()).await;

    poller.abort();
    info!(handled, "todobot stopped");
    Ok(())
}
