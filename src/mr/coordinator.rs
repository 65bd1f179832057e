use std::sync::Arc;

use anyhow::{ensure, Context};
use futures::future::try_join_all;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc,
};
use tracing::{debug, info};

use crate::mr::{
    accumulator::{self, Accumulator},
    grid::Grid,
    lexicon::Lexicon,
    worker::{Batch, Worker, WorkerMessage, WorkerStats, WorkerStatus},
};

/// How the input is cut up and spread over workers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// The number of workers, at least one
    pub workers: usize,
    /// Lines per batch
    pub batch_size: usize,
    /// Batches that may wait in a worker's queue before dispatch blocks
    pub queue_depth: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            batch_size: 32,
            queue_depth: 1,
        }
    }
}

/// The dispatcher side of the pipeline: reads the input and deals batches out round-robin.
/// It only ever waits on a worker's queue having room, never on results.
#[derive(Debug)]
pub struct Coordinator {
    senders: Vec<mpsc::Sender<WorkerMessage>>,
    batch_size: usize,
}

/// What the dispatcher did with the input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub batches: usize,
    pub lines: usize,
}

impl Coordinator {
    pub fn new(senders: Vec<mpsc::Sender<WorkerMessage>>, batch_size: usize) -> Self {
        assert!(!senders.is_empty() && batch_size > 0);
        Self {
            senders,
            batch_size,
        }
    }

    /// The worker batch number `seq` goes to
    pub fn worker_for(&self, seq: usize) -> usize {
        seq % self.senders.len()
    }

    /// Read the whole input, send every batch to its worker and finally one shutdown
    /// message per worker. The first line of the input is a header and is discarded.
    pub async fn dispatch<R>(self, input: R) -> anyhow::Result<DispatchSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut segments = input.split(b'\n');
        let mut summary = DispatchSummary::default();

        if let Some(header) = segments.next_segment().await.context("failed to read input header")? {
            debug!(bytes = header.len(), "[Dispatch] Discarded header line");
        }

        loop {
            let mut lines = Vec::with_capacity(self.batch_size);
            while lines.len() < self.batch_size {
                match segments.next_segment().await.context("failed to read input")? {
                    Some(segment) => lines.push(String::from_utf8_lossy(&segment).into_owned()),
                    None => break,
                }
            }
            if lines.is_empty() {
                break;
            }

            let seq = summary.batches;
            let worker_id = self.worker_for(seq);
            let short = lines.len() < self.batch_size;
            summary.batches += 1;
            summary.lines += lines.len();

            self.senders[worker_id]
                .send(WorkerMessage::Batch(Batch { seq, lines }))
                .await
                .with_context(|| format!("worker #{} stopped accepting batches", worker_id))?;

            if short {
                break;
            }
        }

        for (worker_id, sender) in self.senders.iter().enumerate() {
            sender
                .send(WorkerMessage::Shutdown)
                .await
                .with_context(|| format!("worker #{} stopped before end of input", worker_id))?;
        }
        info!(
            batches = summary.batches,
            lines = summary.lines,
            "[Dispatch] Input exhausted, shutdown sent to every worker"
        );

        Ok(summary)
    }
}

/// Everything a finished run produced
#[derive(Debug)]
pub struct RunOutcome {
    /// Global per-cell totals
    pub totals: Accumulator,
    /// Record statistics summed over all workers
    pub stats: WorkerStats,
    pub dispatch: DispatchSummary,
}

/// Run the whole pipeline over `input`.
///
/// A single worker goes through exactly the same dispatch, shutdown and reduce steps as
/// many do, so the totals never depend on the worker count.
pub async fn run<R>(
    input: R,
    lexicon: Arc<Lexicon>,
    grid: Arc<Grid>,
    options: &PipelineOptions,
) -> anyhow::Result<RunOutcome>
where
    R: AsyncBufRead + Unpin,
{
    ensure!(options.workers > 0, "at least one worker is required");
    ensure!(options.batch_size > 0, "batch size must be positive");
    ensure!(options.queue_depth > 0, "queue depth must be positive");

    info!(
        workers = options.workers,
        batch_size = options.batch_size,
        "[Preparation] Spawning workers"
    );

    let mut senders = Vec::with_capacity(options.workers);
    let mut handles = Vec::with_capacity(options.workers);
    for id in 0..options.workers {
        let (sender, receiver) = mpsc::channel(options.queue_depth);
        let worker = Worker::new(id, Arc::clone(&lexicon), Arc::clone(&grid));
        handles.push(tokio::spawn(worker.run(receiver)));
        senders.push(sender);
    }

    // Dropping the coordinator closes every queue, so workers can't outlive a failed dispatch
    let dispatched = Coordinator::new(senders, options.batch_size)
        .dispatch(input)
        .await;

    // Barrier: reduce only once every worker has handed over its totals
    let outputs = try_join_all(handles)
        .await
        .context("a worker task panicked")?;
    let dispatch = dispatched?;

    let mut stats = WorkerStats::default();
    let mut partials = Vec::with_capacity(outputs.len());
    for output in outputs {
        let output = output?;
        assert_eq!(output.status, WorkerStatus::Done);
        debug!(worker = output.worker_id, cells = output.totals.iter().count(), "[Reduce] Collected partial totals");
        stats += output.stats;
        partials.push(output.totals);
    }

    let totals = accumulator::reduce(partials);
    info!(
        counted = stats.counted,
        malformed = stats.malformed,
        unclassified = stats.unclassified,
        "[Reduce] All workers finished"
    );

    Ok(RunOutcome {
        totals,
        stats,
        dispatch,
    })
}
