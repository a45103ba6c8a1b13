//! Scoring a cipher candidate against the target ciphertext set.

use crate::{
    cipher::Cipher,
    lexicon::{alphabetical, Lexicon},
};

/// Scores candidates by how many target words they decode into lexicon
/// entries. Holds only borrows; the target set and lexicon are immutable for
/// the length of a run, so one evaluator serves every generation.
pub struct Evaluator<'a, L: Lexicon> {
    targets: &'a [String],
    lexicon: &'a L,
    ordered_only: bool,
}

impl<'a, L: Lexicon> Evaluator<'a, L> {
    pub fn new(targets: &'a [String], lexicon: &'a L) -> Self {
        Self {
            targets,
            lexicon,
            ordered_only: false,
        }
    }

    /// Additionally require decoded words to have strictly increasing
    /// letters before they count. Off by default.
    pub fn ordered_only(mut self) -> Self {
        self.ordered_only = true;
        self
    }

    /// Count the target words that decode to lexicon entries under `cipher`.
    /// Pure function of the cipher key; always in `0..=target_count`.
    pub fn score(&self, cipher: &Cipher) -> usize {
        self.targets
            .iter()
            .filter(|word| {
                let decoded = cipher.apply(word);
                self.lexicon.contains(&decoded) && (!self.ordered_only || alphabetical(&decoded))
            })
            .count()
    }

    /// Size of the target set, which is also the perfect score.
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}
