use anyhow::Context;
use log_emitter::{Emitter, EmitterConfig, MongoStore, RecordGenerator};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr; stdout carries only the insert acknowledgements
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config = EmitterConfig::from_env().context("invalid emitter configuration")?;
    tracing::info!(
        uri = %config.mongo_uri,
        database = %config.database,
        collection = %config.collection,
        "Log emitter booting..."
    );

    let store = MongoStore::connect(&config)
        .await
        .context("failed to set up MongoDB client")?;

    let generator = match config.seed {
        Some(seed) => RecordGenerator::seeded(seed),
        None => RecordGenerator::from_os_rng(),
    };

    let mut emitter = Emitter::new(store, generator, std::io::stdout(), config.interval);
    tracing::info!("Log emitter active. Press Ctrl+C to stop.");

    emitter.run().await.context("log emitter stopped")?;
    Ok(())
}
