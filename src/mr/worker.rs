use std::{ops::AddAssign, sync::Arc};

use anyhow::bail;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::mr::{
    accumulator::Accumulator,
    function::sentiment::{self, Outcome},
    grid::Grid,
    lexicon::Lexicon,
};

/// A bounded, ordered group of raw input lines, handed to one worker as a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Dispatch sequence number, starting from 0
    pub seq: usize,
    pub lines: Vec<String>,
}

/// Everything the coordinator ever sends to a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    Batch(Batch),
    /// End of input, sent exactly once per worker
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    Idle,
    Processing,
    Draining,
    Done,
}

/// What happened to the lines a worker saw. Only logged, never part of the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub batches: usize,
    pub lines: usize,
    pub counted: usize,
    pub malformed: usize,
    pub unclassified: usize,
}

impl AddAssign for WorkerStats {
    fn add_assign(&mut self, other: Self) {
        self.batches += other.batches;
        self.lines += other.lines;
        self.counted += other.counted;
        self.malformed += other.malformed;
        self.unclassified += other.unclassified;
    }
}

/// What a worker hands over once it has seen the shutdown message
#[derive(Debug)]
pub struct WorkerOutput {
    pub worker_id: usize,
    /// Always `Done`
    pub status: WorkerStatus,
    pub totals: Accumulator,
    pub stats: WorkerStats,
}

/// One worker owns its accumulator exclusively, nothing is shared but the read-only tables
pub struct Worker {
    id: usize,
    status: WorkerStatus,
    lexicon: Arc<Lexicon>,
    grid: Arc<Grid>,
    totals: Accumulator,
    stats: WorkerStats,
}

impl Worker {
    pub fn new(id: usize, lexicon: Arc<Lexicon>, grid: Arc<Grid>) -> Self {
        Self {
            id,
            status: WorkerStatus::Idle,
            lexicon,
            grid,
            totals: Accumulator::new(),
            stats: WorkerStats::default(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn status(&self) -> WorkerStatus {
        self.status
    }

    /// Map every line of the batch and count the tweets that land in a cell.
    /// Bad lines only cost themselves, the rest of the batch goes on.
    pub fn process_batch(&mut self, batch: &Batch) {
        assert!(matches!(
            self.status,
            WorkerStatus::Idle | WorkerStatus::Processing
        ));
        self.status = WorkerStatus::Processing;
        self.stats.batches += 1;

        for line in &batch.lines {
            self.stats.lines += 1;
            match sentiment::map(line, &self.lexicon, &self.grid) {
                Outcome::Counted { cell, score } => {
                    self.totals.record(&cell.id, score);
                    self.stats.counted += 1;
                }
                Outcome::Malformed(e) => {
                    trace!(worker = self.id, batch = batch.seq, error = %e, "[Worker] Skipped malformed line");
                    self.stats.malformed += 1;
                }
                Outcome::Unclassified(_) => self.stats.unclassified += 1,
            }
        }
    }

    /// Stop taking batches, the end of input has been seen
    pub fn drain(&mut self) {
        assert!(matches!(
            self.status,
            WorkerStatus::Idle | WorkerStatus::Processing
        ));
        self.status = WorkerStatus::Draining;
    }

    /// Hand the totals over, only once draining
    pub fn finish(mut self) -> WorkerOutput {
        assert_eq!(self.status, WorkerStatus::Draining);
        debug!(
            worker = self.id,
            batches = self.stats.batches,
            counted = self.stats.counted,
            malformed = self.stats.malformed,
            unclassified = self.stats.unclassified,
            "[Worker] Shutdown received, handing over totals"
        );
        self.status = WorkerStatus::Done;
        WorkerOutput {
            worker_id: self.id,
            status: self.status,
            totals: self.totals,
            stats: self.stats,
        }
    }

    /// Consume batches until the shutdown message arrives
    pub async fn run(mut self, mut receiver: mpsc::Receiver<WorkerMessage>) -> anyhow::Result<WorkerOutput> {
        debug!(worker = self.id, "[Worker] Waiting for batches");
        while let Some(message) = receiver.recv().await {
            match message {
                WorkerMessage::Batch(batch) => self.process_batch(&batch),
                WorkerMessage::Shutdown => {
                    self.drain();
                    receiver.close();
                    return Ok(self.finish());
                }
            }
        }
        bail!("worker #{} lost its coordinator before end of input", self.id)
    }
}
