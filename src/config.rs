use std::{num::NonZeroUsize, path::PathBuf};

use clap::Parser;

use crate::mr::{coordinator::PipelineOptions, report::ReportLayout};

fn default_workers() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

/// Count geotagged tweets and their sentiment per grid cell
#[derive(Debug, Clone, Parser)]
#[command(name = "grid-sentiment", version)]
pub struct Config {
    /// Grid definition, a JSON feature collection of cells
    #[arg(env = "SENTIMENT_GRID", default_value = "data/melbGrid.json")]
    pub grid: PathBuf,

    /// Sentiment lexicon, one `phrase<TAB>weight` per line
    #[arg(env = "SENTIMENT_LEXICON", default_value = "data/AFINN.txt")]
    pub lexicon: PathBuf,

    /// Tweet dump, a header line followed by one tweet per line
    #[arg(env = "SENTIMENT_TWEETS", default_value = "data/smallTwitter.json")]
    pub tweets: PathBuf,

    /// Number of workers
    #[arg(short, long, env = "SENTIMENT_WORKERS", default_value_t = default_workers())]
    pub workers: NonZeroUsize,

    /// Lines per batch
    #[arg(short, long, env = "SENTIMENT_BATCH_SIZE", default_value = "32")]
    pub batch_size: NonZeroUsize,

    /// Batches a worker may have queued before the dispatcher waits
    #[arg(long, env = "SENTIMENT_QUEUE_DEPTH", default_value = "1")]
    pub queue_depth: NonZeroUsize,

    /// Which cells the report lists
    #[arg(long, value_enum, env = "SENTIMENT_LAYOUT", default_value_t = ReportLayout::Legacy)]
    pub layout: ReportLayout,

    /// Log filter directives
    #[arg(long, env = "RUST_LOG", default_value = "grid_sentiment_rs=info")]
    pub log: String,
}

impl Config {
    pub fn pipeline(&self) -> PipelineOptions {
        PipelineOptions {
            workers: self.workers.get(),
            batch_size: self.batch_size.get(),
            queue_depth: self.queue_depth.get(),
        }
    }
}
