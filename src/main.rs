use std::fs::File;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use practice_test::{Config, PracticeTest};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // The terminal belongs to the UI, so logs only go to a file when asked.
    if let Some(path) = &config.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(config.log_filter()))
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let test = PracticeTest::from_config(&config).context("failed to set up practice test")?;
    test.run().await?;

    Ok(())
}
