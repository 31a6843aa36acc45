// src/pipeline/serve.rs

//! Bot serving loop with the optional scheduler alongside.

use std::sync::Arc;

use crate::bot::{BotService, TelegramClient, run_polling};
use crate::error::Result;
use crate::models::Config;
use crate::pipeline::schedule::run_schedule;
use crate::services::{Corpus, CorpusHandle};
use crate::storage::CsvStorage;

/// Load the corpus and serve queries until Ctrl-C or SIGTERM.
pub async fn run_serve(config: Arc<Config>) -> Result<()> {
    config.require_token()?;

    let storage = CsvStorage::new(&config.store.path);
    let corpus = Corpus::new(storage.load()?);
    log::info!(
        "Loaded {} fatwas from {} at {}",
        corpus.len(),
        storage.path().display(),
        corpus.loaded_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    let corpus = Arc::new(CorpusHandle::new(corpus));

    let client = TelegramClient::new(&config.bot)?;
    let me = client.get_me().await?;
    log::info!(
        "Authorized on account {}",
        me.username.as_deref().unwrap_or(&me.first_name)
    );

    let scheduler = config.schedule.enabled.then(|| {
        tokio::spawn(run_schedule(Arc::clone(&config), Arc::clone(&corpus)))
    });

    let service = BotService::new(corpus, config.bot.clone());
    run_polling(&client, &service, shutdown_signal()).await;

    if let Some(handle) = scheduler {
        handle.abort();
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    log::info!("Received shutdown signal, stopping");
}
