use std::fmt;

use crate::mr::{
    accumulator::{Accumulator, CellTotals},
    grid::Grid,
};

/// The Melbourne grid cells, in the order the report has always listed them
pub const LEGACY_CELLS: [&str; 16] = [
    "A1", "A2", "A3", "A4", "B1", "B2", "B3", "B4", "C1", "C2", "C3", "C4", "C5", "D3", "D4", "D5",
];

/// Which cells the report lists, and in what order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportLayout {
    /// The fixed Melbourne cell list
    #[default]
    Legacy,
    /// Every cell of the loaded grid, in declaration order
    Grid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub cell_id: String,
    pub totals: CellTotals,
}

/// The final per-cell table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    /// Lay out the global totals. Cells without tweets still get a zero row,
    /// cells outside the layout are left out.
    pub fn build(totals: &Accumulator, layout: ReportLayout, grid: &Grid) -> Self {
        let ids: Vec<String> = match layout {
            ReportLayout::Legacy => LEGACY_CELLS.iter().map(|id| id.to_string()).collect(),
            ReportLayout::Grid => grid
                .cells()
                .iter()
                .map(|cell| cell.id.clone())
                .collect(),
        };
        Self::for_cells(totals, ids)
    }

    pub fn for_cells(totals: &Accumulator, ids: impl IntoIterator<Item = String>) -> Self {
        let rows = ids
            .into_iter()
            .map(|cell_id| ReportRow {
                totals: totals.get(&cell_id),
                cell_id,
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<6}{:^18}{:^25}",
            "Cell", "#Total Tweets", "#Overall Sentiment Score"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<8}{:^15}{:^25}",
                row.cell_id, row.totals.count, row.totals.score
            )?;
        }
        Ok(())
    }
}
