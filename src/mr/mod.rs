pub mod accumulator;
pub mod coordinator;
pub mod function;
pub mod grid;
pub mod lexicon;
pub mod record;
pub mod report;
pub mod worker;

pub use accumulator::{Accumulator, CellTotals};
pub use coordinator::{run, PipelineOptions, RunOutcome};
pub use grid::{Cell, Grid};
pub use lexicon::Lexicon;
pub use record::Record;
pub use report::{Report, ReportLayout};
