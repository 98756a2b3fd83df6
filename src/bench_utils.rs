use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{DawgError, builder::DawgBuilder, config::DawgConfig, file::DawgFile};

const CONSONANTS: &[u8] = b"bcdfghjklmnprstvwz";
const VOWELS: &[u8] = b"aeiou";
const SUFFIXES: &[&str] = &["s", "ed", "er", "ing", "ly"];

#[derive(Clone, Debug)]
pub struct LexiconShape {
    pub words: usize,
    pub min_len: usize,
    pub max_len: usize,
    /// Percentage of words that also get an inflected form, which gives the
    /// minimiser shared suffixes to work with.
    pub inflect_percent: u32,
}

impl Default for LexiconShape {
    fn default() -> Self {
        Self {
            words: 5_000,
            min_len: 2,
            max_len: 9,
            inflect_percent: 40,
        }
    }
}

/// Deterministic pseudo-words alternating consonants and vowels, sorted and
/// deduplicated.
pub fn generate_lexicon(shape: &LexiconShape, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut words = Vec::with_capacity(shape.words * 2);
    let max_len = shape.max_len.max(shape.min_len);
    for _ in 0..shape.words {
        let len = rng.gen_range(shape.min_len..=max_len);
        let mut word = String::with_capacity(len + 3);
        let mut vowel = rng.gen_range(0..2) == 0;
        for _ in 0..len {
            let pool = if vowel { VOWELS } else { CONSONANTS };
            word.push(pool[rng.gen_range(0..pool.len())] as char);
            vowel = !vowel;
        }
        if rng.gen_range(0..100) < shape.inflect_percent {
            let suffix = SUFFIXES[rng.gen_range(0..SUFFIXES.len())];
            words.push(format!("{word}{suffix}"));
        }
        words.push(word);
    }
    words.sort();
    words.dedup();
    words
}

pub fn build_file(words: &[String], config: DawgConfig) -> Result<DawgFile, DawgError> {
    let bytes = DawgBuilder::with_config(&config).words(words)?.build()?;
    DawgFile::from_bytes(bytes, config)
}
