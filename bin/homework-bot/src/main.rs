//! Entrypoint.

use clap::Parser;
use config::Opts;
use dotenvy::dotenv;
use homework::{EndpointClient, Notifier, Poller, TelegramBot};
use runtime::shutdown::{Exit, ShutdownSignal, run_until_shutdown};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        dotenvy::from_filename(custom_env_file)?;
    } else {
        // Try the default .env file, and ignore if it doesn't exist.
        dotenv().ok();
    }

    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    info!("📚 Homework bot starting...");

    let credentials = match opts.credentials.check() {
        Ok(credentials) => credentials,
        Err(e) if opts.allow_missing_credentials => {
            error!(%e, "Continuing with missing credentials");
            opts.credentials.lenient()
        }
        Err(e) => {
            error!(%e, "Refusing to start");
            return Err(e.into());
        }
    };

    let timeout = opts.poll.request_timeout();
    let client =
        EndpointClient::new(opts.poll.endpoint.clone(), credentials.endpoint_token, timeout)?;
    let bot = TelegramBot::new(opts.poll.telegram_api_url.clone(), credentials.bot_token, timeout)?;
    let poller = Poller::new(client, Notifier::new(bot, credentials.chat_id), &opts.poll);

    match run_until_shutdown(poller.run(), ShutdownSignal::new()?, || info!("Homework bot stopped"))
        .await
    {
        Exit::Completed(result) => Ok(result?),
        Exit::Shutdown => Ok(()),
    }
}
