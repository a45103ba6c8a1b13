//! A cipher candidate: one permutation of the alphabet, plus its cached fitness.

use crate::{
    constants::PERMEVO_ALPHABET_LEN,
    random::{EvolutionEvent, Happens},
};
use core::fmt;
use rand::{seq::SliceRandom, Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::{error::Error, fs, path::Path};

/// A bijective mapping from ciphertext letters to plaintext letters.
/// `key[i]` holds the plaintext byte for ciphertext letter `b'a' + i`.
/// The key is a permutation of the alphabet at all times; operators that
/// would break that repair it before returning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cipher {
    key: [u8; PERMEVO_ALPHABET_LEN],
    fitness: Option<usize>,
}

impl Cipher {
    /// The cipher that decodes every letter to itself.
    pub fn identity() -> Self {
        let mut key = [0; PERMEVO_ALPHABET_LEN];
        for (i, slot) in key.iter_mut().enumerate() {
            *slot = b'a' + i as u8;
        }
        Self { key, fitness: None }
    }

    /// A uniformly random permutation of the alphabet.
    pub fn random(rng: &mut impl RngCore) -> Self {
        let mut cipher = Self::identity();
        cipher.key.shuffle(rng);
        cipher
    }

    pub fn from_key(key: [u8; PERMEVO_ALPHABET_LEN]) -> Self {
        let cipher = Self { key, fitness: None };
        debug_assert!(cipher.is_permutation());
        cipher
    }

    pub fn key(&self) -> &[u8; PERMEVO_ALPHABET_LEN] {
        &self.key
    }

    /// The cached fitness, if this cipher has been scored since its key last
    /// changed.
    pub fn fitness(&self) -> Option<usize> {
        self.fitness
    }

    pub(crate) fn cache_fitness(&mut self, fitness: usize) {
        self.fitness = Some(fitness);
    }

    /// Decode one lowercase word through the key. Pure; same input always
    /// yields the same output.
    pub fn apply(&self, word: &str) -> String {
        debug_assert!(word.bytes().all(|b| b.is_ascii_lowercase()));
        word.bytes()
            .map(|b| self.key[(b - b'a') as usize] as char)
            .collect()
    }

    /// Combine two parent keys into a child key. The child starts as a copy
    /// of `self`; past a random split point it adopts `other`'s letter at
    /// each position by swapping it in from wherever the child currently
    /// holds it, so the result is a permutation by construction.
    ///
    /// Parents are untouched. The child's fitness is unset until evaluated.
    /// Crossing a cipher with itself reproduces its key exactly.
    pub fn crossover(&self, other: &Self, rng: &mut impl RngCore) -> Self {
        let mut key = self.key;
        let split = rng.random_range(0..PERMEVO_ALPHABET_LEN);
        for i in split..PERMEVO_ALPHABET_LEN {
            let want = other.key[i];
            if key[i] != want {
                let j = key
                    .iter()
                    .position(|&b| b == want)
                    .expect("key is a permutation");
                key.swap(i, j);
            }
        }

        let child = Self { key, fitness: None };
        debug_assert!(child.is_permutation());
        child
    }

    /// With the bound `Mutate` probability, swap two random key positions.
    /// Swapping two entries of a permutation is still a permutation, so no
    /// repair is needed. Clears the cached fitness when a swap happens.
    pub fn mutate(&mut self, rng: &mut (impl RngCore + Happens)) {
        if rng.happens(EvolutionEvent::Mutate) {
            let l = rng.random_range(0..PERMEVO_ALPHABET_LEN);
            let r = rng.random_range(0..PERMEVO_ALPHABET_LEN);
            self.key.swap(l, r);
            self.fitness = None;
        }
    }

    /// Whether every alphabet letter appears in the key exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut seen = 0u32;
        for &b in self.key.iter() {
            if !b.is_ascii_lowercase() {
                return false;
            }
            seen |= 1 << (b - b'a');
        }
        seen == (1 << PERMEVO_ALPHABET_LEN) - 1
    }

    pub fn to_json(&self) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, Box<dyn Error>> {
        let mut cipher: Self = serde_json::from_str(s)?;
        if !cipher.is_permutation() {
            return Err("key is not a permutation".into());
        }
        // a persisted fitness was scored against whatever targets the
        // writer had; force a rescore under the loader's
        cipher.fitness = None;
        Ok(cipher)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

impl fmt::Display for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.key.iter() {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}
