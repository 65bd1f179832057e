use std::{collections::HashMap, path::Path};

use regex::Regex;

use crate::error::ConfigError;

/// Characters dropped from the end of a window before the lookup, at most one per window
const TRAILING_PUNCTUATION: [char; 6] = ['!', ',', '?', '.', '\'', '"'];

/// The phrase -> sentiment weight table used to score tweets.
/// Weights are 32-bit so that tweet scores and cell sums, kept in 64 bits, cannot overflow.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    weights: HashMap<String, i32>,
    /// The longest phrase in the table, in words
    max_phrase_len: usize,
}

impl Lexicon {
    pub fn new(weights: HashMap<String, i32>) -> Self {
        let max_phrase_len = weights
            .keys()
            .map(|phrase| phrase.split_whitespace().count())
            .max()
            .unwrap_or(0);
        Self {
            weights,
            max_phrase_len,
        }
    }

    /// Read and parse a lexicon file, one `phrase<TAB>weight` entry per line
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let entry = Regex::new(r"^(?P<phrase>[^\t]+)\t\s*(?P<weight>[+-]?\d+)\s*$")
            .expect("static pattern");
        let mut weights = HashMap::new();

        for (index, raw) in contents.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let malformed = || ConfigError::LexiconLine {
                line: index + 1,
                content: line.to_string(),
            };
            let caps = entry.captures(line).ok_or_else(malformed)?;
            // Out of range weights are rejected along with malformed ones
            let weight = caps["weight"].parse::<i32>().map_err(|_| malformed())?;
            // Later entries override earlier ones
            weights.insert(caps["phrase"].to_string(), weight);
        }

        if weights.is_empty() {
            return Err(ConfigError::EmptyLexicon);
        }
        Ok(Self::new(weights))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn max_phrase_len(&self) -> usize {
        self.max_phrase_len
    }

    pub fn weight(&self, phrase: &str) -> Option<i64> {
        self.weights.get(phrase).map(|&weight| i64::from(weight))
    }

    /// Score already lowercased text.
    ///
    /// Every window of 1 to `max_phrase_len` consecutive words is looked up on its own,
    /// so overlapping phrases all contribute: with `happy = 2` and `not happy = -3`,
    /// "not happy" scores -1.
    pub fn score(&self, text: &str) -> i64 {
        let words = text.split_whitespace().collect::<Vec<&str>>();
        let mut total = 0;
        let mut window = String::new();

        for len in 1..=self.max_phrase_len {
            for phrase in words.windows(len) {
                window.clear();
                for (i, word) in phrase.iter().enumerate() {
                    if i > 0 {
                        window.push(' ');
                    }
                    window.push_str(word);
                }
                if window.ends_with(TRAILING_PUNCTUATION) {
                    window.pop();
                }
                if let Some(weight) = self.weight(&window) {
                    total += weight;
                }
            }
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon(entries: &[(&str, i32)]) -> Lexicon {
        Lexicon::new(
            entries
                .iter()
                .map(|(phrase, weight)| (phrase.to_string(), *weight))
                .collect(),
        )
    }

    #[test]
    fn overlapping_phrases_all_count() {
        let lexicon = lexicon(&[("happy", 2), ("not happy", -3)]);
        assert_eq!(lexicon.max_phrase_len(), 2);
        assert_eq!(lexicon.score("i am not happy today"), -1);
    }

    #[test]
    fn repeated_words_score_each_time() {
        let lexicon = lexicon(&[("good", 3)]);
        assert_eq!(lexicon.score("good good bad good"), 9);
    }

    #[test]
    fn only_one_trailing_character_is_stripped() {
        let lexicon = lexicon(&[("great", 3), ("so great", 1)]);
        assert_eq!(lexicon.score("great!"), 3);
        assert_eq!(lexicon.score("great!!"), 0);
        // The unigram "so" misses, the bigram "so great." is trimmed to "so great"
        assert_eq!(lexicon.score("so great."), 4);
    }

    #[test]
    fn punctuation_inside_a_window_blocks_the_phrase() {
        let lexicon = lexicon(&[("not happy", -3)]);
        assert_eq!(lexicon.score("not, happy"), 0);
        assert_eq!(lexicon.score("not happy,"), -3);
    }

    #[test]
    fn no_match_scores_zero() {
        let lexicon = lexicon(&[("good", 1)]);
        assert_eq!(lexicon.score(""), 0);
        assert_eq!(lexicon.score("nothing to see"), 0);
    }

    #[test]
    fn phrases_longer_than_the_text_are_skipped() {
        let lexicon = lexicon(&[("does not work", -2), ("work", 1)]);
        assert_eq!(lexicon.max_phrase_len(), 3);
        assert_eq!(lexicon.score("work"), 1);
    }

    #[test]
    fn parse_reads_tab_separated_entries() {
        let lexicon = Lexicon::parse("abandon\t-2\ncool stuff\t3\r\n\nyes\t+1\n").unwrap();
        assert_eq!(lexicon.len(), 3);
        assert_eq!(lexicon.weight("abandon"), Some(-2));
        assert_eq!(lexicon.weight("cool stuff"), Some(3));
        assert_eq!(lexicon.weight("yes"), Some(1));
        assert_eq!(lexicon.max_phrase_len(), 2);
    }

    #[test]
    fn parse_rejects_a_line_without_weight() {
        let err = Lexicon::parse("good\t1\nbad\n").unwrap_err();
        match err {
            ConfigError::LexiconLine { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "bad");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn extreme_weights_add_up_without_wrapping() {
        let lexicon = Lexicon::parse("huge\t2147483647\ntiny\t-2147483648\n").unwrap();
        assert_eq!(lexicon.score("huge huge"), 2 * i64::from(i32::MAX));
        assert_eq!(lexicon.score("tiny tiny tiny"), 3 * i64::from(i32::MIN));
    }

    #[test]
    fn parse_rejects_weights_beyond_32_bits() {
        let err = Lexicon::parse("huge\t9223372036854775807\n").unwrap_err();
        assert!(matches!(err, ConfigError::LexiconLine { line: 1, .. }));
        assert!(Lexicon::parse("huge\t2147483648\n").is_err());
    }

    #[test]
    fn parse_tolerates_spaces_around_the_weight() {
        let lexicon = Lexicon::parse("good\t3 \nbad\t -2\n").unwrap();
        assert_eq!(lexicon.weight("good"), Some(3));
        assert_eq!(lexicon.weight("bad"), Some(-2));
    }

    #[test]
    fn parse_rejects_an_empty_file() {
        assert!(matches!(Lexicon::parse("\n\n"), Err(ConfigError::EmptyLexicon)));
    }
}
