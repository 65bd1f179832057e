//! The hard-coded map function every worker applies to its input lines

/// Geotagged sentiment application
pub mod sentiment {
    use crate::{
        error::MalformedRecord,
        mr::{grid::Cell, grid::Grid, lexicon::Lexicon, record::Record},
    };

    /// A record together with the score its text earned
    #[derive(Debug, Clone, PartialEq)]
    pub struct ScoredRecord {
        pub record: Record,
        pub score: i64,
    }

    /// What became of one raw line
    #[derive(Debug)]
    pub enum Outcome<'g> {
        /// The tweet lands in `cell` and adds `score` to it
        Counted { cell: &'g Cell, score: i64 },
        /// The line could not be repaired or lacks a field, it is dropped
        Malformed(MalformedRecord),
        /// A valid tweet outside every cell, it is dropped as well
        Unclassified(ScoredRecord),
    }

    pub fn score(record: Record, lexicon: &Lexicon) -> ScoredRecord {
        let score = lexicon.score(&record.text);
        ScoredRecord { record, score }
    }

    pub fn map<'g>(line: &str, lexicon: &Lexicon, grid: &'g Grid) -> Outcome<'g> {
        let record = match Record::parse(line) {
            Ok(record) => record,
            Err(e) => return Outcome::Malformed(e),
        };
        let scored = score(record, lexicon);
        match grid.classify(scored.record.x, scored.record.y) {
            Some(cell) => Outcome::Counted {
                cell,
                score: scored.score,
            },
            None => Outcome::Unclassified(scored),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::sentiment::{map, Outcome};
    use crate::mr::{grid::Cell, grid::Grid, lexicon::Lexicon};

    fn tweet(text: &str, x: f64, y: f64) -> String {
        format!(
            r#"{{"id":"t","value":{{"geometry":{{"type":"Point","coordinates":[{x},{y}]}},"properties":{{"text":"{text}"}}}}}},"#
        )
    }

    #[test]
    fn map_scores_and_classifies() {
        let lexicon = Lexicon::new(HashMap::from([("good".to_string(), 1)]));
        let grid = Grid::new(vec![Cell::new("A1", 0.0, 10.0, 0.0, 10.0)]).unwrap();

        match map(&tweet("Good day", 5.0, 5.0), &lexicon, &grid) {
            Outcome::Counted { cell, score } => {
                assert_eq!(cell.id, "A1");
                assert_eq!(score, 1);
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        match map(&tweet("bad day", 50.0, 50.0), &lexicon, &grid) {
            Outcome::Unclassified(scored) => assert_eq!(scored.score, 0),
            other => panic!("unexpected outcome {other:?}"),
        }

        assert!(matches!(
            map("{\"value\":", &lexicon, &grid),
            Outcome::Malformed(_)
        ));
    }
}
