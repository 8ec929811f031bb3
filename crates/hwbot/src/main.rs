use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use hwbot_core::{
    config::{self, Config},
    notifier::Notifier,
};
use hwbot_practicum::PracticumClient;
use hwbot_telegram::TelegramMessenger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` may carry RUST_LOG, so it must be applied before the subscriber.
    config::load_dotenv();
    hwbot_core::logging::init("hwbot")?;

    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("{e}");
            return Err(e).context("startup aborted");
        }
    };

    let source = Arc::new(PracticumClient::from_config(&cfg)?);
    let messenger = TelegramMessenger::from_token(cfg.telegram_token.clone());
    if let Some(name) = messenger.username().await {
        tracing::info!("hwbot started: @{name}");
    }

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    Notifier::new(&cfg, source, Arc::new(messenger))
        .run(shutdown)
        .await;

    Ok(())
}
