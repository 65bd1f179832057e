pub mod config;
pub mod error;
pub mod mr;

use std::sync::Arc;

use anyhow::Context;
use tokio::{fs::File, io::BufReader};
use tracing::info;

use crate::{
    config::Config,
    mr::{Grid, Lexicon, Report, RunOutcome},
};

/// Load the lexicon and the grid, run the pipeline over the tweet file and lay out the report.
/// Both tables are loaded before the tweet file is touched, so a bad table never leaves
/// a partial result behind.
pub async fn execute(config: &Config) -> anyhow::Result<(Report, RunOutcome)> {
    let lexicon = Lexicon::load(&config.lexicon)
        .with_context(|| format!("failed to load lexicon {}", config.lexicon.display()))?;
    let grid = Grid::load(&config.grid)
        .with_context(|| format!("failed to load grid {}", config.grid.display()))?;
    info!(
        phrases = lexicon.len(),
        max_phrase_len = lexicon.max_phrase_len(),
        cells = grid.cells().len(),
        "[Preparation] Lexicon and grid loaded"
    );

    let tweets = File::open(&config.tweets)
        .await
        .with_context(|| format!("failed to open tweets {}", config.tweets.display()))?;

    let grid = Arc::new(grid);
    let outcome = mr::run(
        BufReader::new(tweets),
        Arc::new(lexicon),
        Arc::clone(&grid),
        &config.pipeline(),
    )
    .await?;

    let report = Report::build(&outcome.totals, config.layout, &grid);
    Ok((report, outcome))
}
