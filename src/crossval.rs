//! Comparison of decoded dictionaries against trusted reference word lists.
//!
//! A decoder with the right field layout accepts every reference word and
//! nothing else; anything below a full match points at a wrong field
//! extraction. False positives are found by exhaustively probing every short
//! letter string, by optional seeded random samples of longer strings, and by
//! optionally checking the full enumeration against the list.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::DawgConfig;
use crate::errors::DawgError;
use crate::file::DawgFile;
use crate::format::NodeEncoding;
use crate::query::{QueryEngine, Verdict};
use crate::word::normalize;

/// A reference word list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lexicon {
    words: BTreeSet<String>,
    skipped: usize,
}

impl Lexicon {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DawgError> {
        let file = fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// One word per line; blank lines and `#` comments are ignored, case is
    /// folded, and entries that can never be words are counted as skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DawgError> {
        let mut lexicon = Lexicon::default();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let entry = line.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            lexicon.insert(entry);
        }
        Ok(lexicon)
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lexicon = Lexicon::default();
        for word in words {
            lexicon.insert(word.as_ref());
        }
        lexicon
    }

    fn insert(&mut self, entry: &str) {
        match normalize(entry) {
            Some(bytes) => {
                self.words
                    .insert(String::from_utf8_lossy(&bytes).into_owned());
            }
            None => self.skipped += 1,
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Entries rejected while loading.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn words_of_len(&self, len: usize) -> impl Iterator<Item = &str> {
        self.iter().filter(move |word| word.len() == len)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CrossValidationOptions {
    /// Every letter string of length 2 up to this is checked.
    pub exhaustive_max_len: usize,
    /// Number of random samples of longer strings.
    pub random_samples: usize,
    pub random_min_len: usize,
    pub random_max_len: usize,
    pub seed: u64,
    /// Also compare the full enumeration with the lexicon.
    pub check_enumeration: bool,
}

impl Default for CrossValidationOptions {
    fn default() -> Self {
        Self {
            exhaustive_max_len: 3,
            random_samples: 0,
            random_min_len: 4,
            random_max_len: 8,
            seed: 0x5EED,
            check_enumeration: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LengthStats {
    pub reference: usize,
    pub accepted: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CrossReport {
    pub reference_words: usize,
    pub accepted: usize,
    pub match_rate: f64,
    pub section1_only: usize,
    pub section2_only: usize,
    pub both_sections: usize,
    pub samples_checked: usize,
    /// Words enumerated when the enumeration check ran. Enumeration walks
    /// strict chains, so under an open-range policy this can be smaller than
    /// the set `validate` accepts.
    pub enumerated: Option<usize>,
    pub enumeration_faults: Option<usize>,
    pub false_negatives: Vec<String>,
    pub false_positives: Vec<String>,
    pub by_length: BTreeMap<usize, LengthStats>,
}

impl CrossReport {
    /// Every reference word accepted and nothing else.
    pub fn is_exact(&self) -> bool {
        self.false_negatives.is_empty() && self.false_positives.is_empty()
    }
}

pub fn cross_validate(
    engine: &QueryEngine<'_>,
    lexicon: &Lexicon,
    options: &CrossValidationOptions,
) -> CrossReport {
    let words: Vec<&str> = lexicon.iter().collect();
    let verdicts: Vec<(&str, Verdict)> = words
        .par_iter()
        .map(|word| (*word, engine.check(word)))
        .collect();

    let mut report = CrossReport {
        reference_words: lexicon.len(),
        ..CrossReport::default()
    };
    for (word, verdict) in &verdicts {
        let stats = report.by_length.entry(word.len()).or_default();
        stats.reference += 1;
        if verdict.is_word() {
            stats.accepted += 1;
            report.accepted += 1;
        } else {
            report.false_negatives.push((*word).to_string());
        }
        match (verdict.section1, verdict.section2) {
            (true, true) => report.both_sections += 1,
            (true, false) => report.section1_only += 1,
            (false, true) => report.section2_only += 1,
            (false, false) => {}
        }
    }
    report.match_rate = if lexicon.is_empty() {
        0.0
    } else {
        report.accepted as f64 / lexicon.len() as f64
    };

    let mut false_positives = BTreeSet::new();
    let samples = sample_strings(options);
    report.samples_checked = samples.len();
    false_positives.extend(
        samples
            .into_par_iter()
            .filter(|sample| !lexicon.contains(sample) && engine.validate(sample))
            .collect::<Vec<_>>(),
    );

    if options.check_enumeration {
        let mut words = engine.enumerate();
        let mut count = 0;
        for word in words.by_ref() {
            count += 1;
            if !lexicon.contains(&word) {
                false_positives.insert(word);
            }
        }
        report.enumerated = Some(count);
        report.enumeration_faults = Some(words.faults());
    }
    report.false_positives = false_positives.into_iter().collect();

    info!(
        reference = report.reference_words,
        accepted = report.accepted,
        false_negatives = report.false_negatives.len(),
        false_positives = report.false_positives.len(),
        "cross-validation finished"
    );
    report
}

/// Exhaustive short samples followed by the seeded random ones.
pub fn sample_strings(options: &CrossValidationOptions) -> Vec<String> {
    let mut samples = Vec::new();
    let mut current = Vec::with_capacity(options.exhaustive_max_len);
    for len in 2..=options.exhaustive_max_len {
        extend_exhaustive(&mut samples, &mut current, len);
    }
    if options.random_samples > 0 && options.random_min_len <= options.random_max_len {
        let mut rng = StdRng::seed_from_u64(options.seed);
        for _ in 0..options.random_samples {
            let len = rng.gen_range(options.random_min_len..=options.random_max_len);
            let sample: String = (0..len)
                .map(|_| (b'a' + rng.gen_range(0..26u8)) as char)
                .collect();
            samples.push(sample);
        }
    }
    samples
}

fn extend_exhaustive(out: &mut Vec<String>, current: &mut Vec<u8>, len: usize) {
    if current.len() == len {
        out.push(String::from_utf8_lossy(current).into_owned());
        return;
    }
    for letter in b'a'..=b'z' {
        current.push(letter);
        extend_exhaustive(out, current, len);
        current.pop();
    }
}

/// Outcome of decoding the same bytes with one node encoding.
#[derive(Clone, Debug, Serialize)]
pub struct EncodingScore {
    pub encoding: NodeEncoding,
    pub match_rate: f64,
    pub false_negatives: usize,
    pub false_positives: usize,
    pub load_error: Option<String>,
}

/// Decode `bytes` under every node encoding and rank the results, best
/// match first. Encodings that fail to load are ranked last.
pub fn rank_encodings(
    bytes: &[u8],
    config: &DawgConfig,
    lexicon: &Lexicon,
    options: &CrossValidationOptions,
) -> Vec<EncodingScore> {
    let mut scores: Vec<EncodingScore> = NodeEncoding::ALL
        .iter()
        .map(|&encoding| {
            let config = config.clone().with_encoding(encoding);
            match DawgFile::from_bytes(bytes.to_vec(), config) {
                Ok(file) => {
                    let engine = QueryEngine::new(&file);
                    let report = cross_validate(&engine, lexicon, options);
                    EncodingScore {
                        encoding,
                        match_rate: report.match_rate,
                        false_negatives: report.false_negatives.len(),
                        false_positives: report.false_positives.len(),
                        load_error: None,
                    }
                }
                Err(err) => {
                    warn!(%encoding, %err, "encoding failed to load");
                    EncodingScore {
                        encoding,
                        match_rate: 0.0,
                        false_negatives: lexicon.len(),
                        false_positives: 0,
                        load_error: Some(err.to_string()),
                    }
                }
            }
        })
        .collect();
    scores.sort_by(|a, b| {
        a.load_error
            .is_some()
            .cmp(&b.load_error.is_some())
            .then(b.match_rate.total_cmp(&a.match_rate))
            .then(a.false_positives.cmp(&b.false_positives))
    });
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_skips_comments_and_invalid_entries() {
        let text = "# reference\nAA\n\nqi\nx\nco-op\nzzz\n";
        let lexicon = Lexicon::from_reader(text.as_bytes()).unwrap();
        assert_eq!(lexicon.iter().collect::<Vec<_>>(), vec!["aa", "qi", "zzz"]);
        assert_eq!(lexicon.skipped(), 2);
        assert_eq!(lexicon.words_of_len(2).count(), 2);
    }

    #[test]
    fn test_exhaustive_sample_counts() {
        let options = CrossValidationOptions {
            exhaustive_max_len: 3,
            ..CrossValidationOptions::default()
        };
        let samples = sample_strings(&options);
        assert_eq!(samples.len(), 26 * 26 + 26 * 26 * 26);
        assert_eq!(samples[0], "aa");
        assert_eq!(samples.last().map(String::as_str), Some("zzz"));
    }

    #[test]
    fn test_random_samples_are_seeded() {
        let options = CrossValidationOptions {
            exhaustive_max_len: 1,
            random_samples: 16,
            ..CrossValidationOptions::default()
        };
        let first = sample_strings(&options);
        let second = sample_strings(&options);
        assert_eq!(first.len(), 16);
        assert_eq!(first, second);
        assert!(first.iter().all(|p| (4..=8).contains(&p.len())));
    }
}
