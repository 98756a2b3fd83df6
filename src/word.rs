//! Word normalisation and reconstructed lookup paths.

use serde::Serialize;

use crate::file::Section;
use crate::format::constants::MIN_WORD_LEN;

/// Case-fold an ASCII word to lowercase bytes.
///
/// Returns `None` for anything that can never be a dictionary word: strings
/// shorter than two letters or containing a non-letter.
pub fn normalize(word: &str) -> Option<Vec<u8>> {
    if word.len() < MIN_WORD_LEN || !word.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    Some(word.bytes().map(|b| b.to_ascii_lowercase()).collect())
}

/// The nodes a successful lookup walked, in storage order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LetterPath {
    pub section: Section,
    /// Letters in the order they were consumed (reversed for Section 1).
    pub letters: Vec<u8>,
    /// Node index matched for each letter. For Section 1 the first letter is
    /// resolved by the letter index and has no node, so this is one shorter
    /// than `letters`.
    pub nodes: Vec<u32>,
}

impl LetterPath {
    pub fn word(&self) -> String {
        let mut bytes = self.letters.clone();
        if self.section == Section::Suffix {
            bytes.reverse();
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_case() {
        assert_eq!(normalize("QI"), Some(b"qi".to_vec()));
    }

    #[test]
    fn test_normalize_rejects_short_and_non_alpha() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("a"), None);
        assert_eq!(normalize("co-op"), None);
        assert_eq!(normalize("naïve"), None);
    }

    #[test]
    fn test_suffix_path_word_is_reversed() {
        let path = LetterPath {
            section: Section::Suffix,
            letters: b"ix".to_vec(),
            nodes: vec![4],
        };
        assert_eq!(path.word(), "xi");
    }
}
