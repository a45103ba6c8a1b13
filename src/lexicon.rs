//! The dictionary index queried by fitness evaluation, and the optional
//! letter-ordering filter.

use fxhash::FxHashSet;
use std::{error::Error, fs, path::Path};

/// Exact-membership lookup over a fixed vocabulary. Built once before
/// evolution starts, read-only for the length of a run. `Sync` because
/// parallel evaluation queries it from every scoring task at once.
pub trait Lexicon: Sync {
    /// Case-insensitive exact match.
    fn contains(&self, word: &str) -> bool;
}

/// Hash-set-backed [Lexicon] over a word list of uniform length.
#[derive(Debug, Clone, Default)]
pub struct WordList(FxHashSet<String>);

impl WordList {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            words
                .into_iter()
                .map(|w| w.as_ref().to_ascii_lowercase())
                .collect(),
        )
    }

    /// Load a newline-separated word list, keeping only words of
    /// `word_length` letters. Failing to read the file is a setup error for
    /// the caller; evolution must not have started yet.
    pub fn from_file<P: AsRef<Path>>(path: P, word_length: usize) -> Result<Self, Box<dyn Error>> {
        let raw = fs::read_to_string(path)?;
        Ok(Self::new(
            raw.lines()
                .map(str::trim)
                .filter(|w| w.len() == word_length && w.bytes().all(|b| b.is_ascii_alphabetic())),
        ))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Lexicon for WordList {
    fn contains(&self, word: &str) -> bool {
        if word.bytes().any(|b| b.is_ascii_uppercase()) {
            self.0.contains(&word.to_ascii_lowercase())
        } else {
            self.0.contains(word)
        }
    }
}

/// Whether every adjacent letter pair in `word` is strictly increasing.
/// Bails at the first pair that is not.
pub fn alphabetical(word: &str) -> bool {
    word.as_bytes().windows(2).all(|pair| pair[0] < pair[1])
}
