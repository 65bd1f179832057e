use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading the lexicon or the grid.
/// Any of these aborts the run before a single record is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lexicon line {line} is not `phrase<TAB>weight`: {content:?}")]
    LexiconLine { line: usize, content: String },

    #[error("lexicon contains no phrases")]
    EmptyLexicon,

    #[error("grid file is not valid: {0}")]
    GridFormat(#[from] serde_json::Error),

    #[error("grid contains no cells")]
    EmptyGrid,

    #[error("cell {id} has an invalid bounding box ({xmin}, {xmax}, {ymin}, {ymax})")]
    InvalidCell {
        id: String,
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
    },

    #[error("cell {0} is declared more than once")]
    DuplicateCell(String),
}

/// A single input line that could not be turned into a record.
/// Workers skip the line and carry on with the batch.
#[derive(Debug, Error)]
pub enum MalformedRecord {
    #[error("line could not be repaired into a closed structure")]
    Unrepairable,

    #[error("line is not valid JSON after repair: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("record is missing a usable field: {0}")]
    Field(#[source] serde_json::Error),

    #[error("coordinates must hold at least two numbers, got {0}")]
    Coordinates(usize),
}
