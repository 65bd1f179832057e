use clap::Parser;
use grid_sentiment_rs::{config::Config, execute};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// The whole run happens in-process:
/// 1. Load the lexicon and the grid, any failure here aborts before a tweet is read
/// 2. Deal the tweet file out to the workers in fixed-size batches
/// 3. Merge every worker's totals and print the report to stdout
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr, stdout only carries the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log)?)
        .with_writer(std::io::stderr)
        .init();

    info!(
        grid = %config.grid.display(),
        lexicon = %config.lexicon.display(),
        tweets = %config.tweets.display(),
        workers = config.workers.get(),
        batch_size = config.batch_size.get(),
        "[Configuration] Starting run"
    );

    let (report, outcome) = execute(&config).await?;

    print!("{}", report);
    info!(
        batches = outcome.dispatch.batches,
        lines = outcome.dispatch.lines,
        counted = outcome.stats.counted,
        "[Report] Run finished"
    );

    Ok(())
}
