use std::collections::BTreeMap;

use rayon::prelude::*;

/// Tweet count and summed sentiment of one cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellTotals {
    pub count: u64,
    pub score: i64,
}

impl CellTotals {
    fn absorb(&mut self, other: CellTotals) {
        self.count += other.count;
        self.score += other.score;
    }
}

/// Per-cell totals owned by a single worker until the reduce step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulator {
    cells: BTreeMap<String, CellTotals>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one classified tweet against a cell
    pub fn record(&mut self, cell_id: &str, score: i64) {
        let tweet = CellTotals { count: 1, score };
        if let Some(totals) = self.cells.get_mut(cell_id) {
            totals.absorb(tweet);
            return;
        }
        self.cells.insert(cell_id.to_owned(), tweet);
    }

    /// Totals of a cell, zero if nothing was recorded for it
    pub fn get(&self, cell_id: &str) -> CellTotals {
        self.cells.get(cell_id).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CellTotals)> {
        self.cells.iter().map(|(id, totals)| (id.as_str(), *totals))
    }

    /// Sum two accumulators over the union of their cells.
    /// Associative and commutative, so partial results may be combined in any order.
    pub fn merge(mut self, other: Accumulator) -> Accumulator {
        for (id, totals) in other.cells {
            self.cells.entry(id).or_default().absorb(totals);
        }
        self
    }
}

impl FromIterator<(String, CellTotals)> for Accumulator {
    fn from_iter<I: IntoIterator<Item = (String, CellTotals)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Accumulator::new(), |mut acc, (id, totals)| {
                acc.cells.entry(id).or_default().absorb(totals);
                acc
            })
    }
}

/// Fold every worker's partial result into the global one
pub fn reduce(partials: Vec<Accumulator>) -> Accumulator {
    partials
        .into_par_iter()
        .reduce(Accumulator::new, Accumulator::merge)
}
