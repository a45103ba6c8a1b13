//! Functions and structs related to managing ciphers at the population scale.

use crate::{cipher::Cipher, fitness::Evaluator, lexicon::Lexicon};
use rand::RngCore;
use std::{error::Error, fs::read_dir, path::Path};

/// An ordered collection of cipher candidates plus a generation counter.
/// The size is fixed at construction; culled individuals are always replaced
/// before the next generation is evaluated.
#[derive(Debug, Clone)]
pub struct Population {
    pub individuals: Vec<Cipher>,
    pub age: usize,
}

impl Population {
    /// A fresh population of `size` uniformly random ciphers, age 0.
    pub fn init(size: usize, rng: &mut impl RngCore) -> Self {
        Self {
            individuals: (0..size).map(|_| Cipher::random(rng)).collect(),
            age: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Score every individual that lacks a cached fitness. On the first
    /// generation that is everyone; afterwards only new offspring.
    #[cfg(not(feature = "parallel"))]
    pub fn evaluate<L: Lexicon>(&mut self, evaluator: &Evaluator<L>) {
        for cipher in self.individuals.iter_mut() {
            if cipher.fitness().is_none() {
                let score = evaluator.score(cipher);
                cipher.cache_fitness(score);
            }
        }
    }

    /// Score every individual that lacks a cached fitness, one rayon task
    /// per individual. Scoring reads only the immutable target set and
    /// lexicon and writes only the individual's own cache, and the join
    /// below is the barrier before selection may proceed.
    #[cfg(feature = "parallel")]
    pub fn evaluate<L: Lexicon>(&mut self, evaluator: &Evaluator<L>) {
        use rayon::prelude::*;
        self.individuals
            .par_iter_mut()
            .filter(|cipher| cipher.fitness().is_none())
            .for_each(|cipher| {
                let score = evaluator.score(cipher);
                cipher.cache_fitness(score);
            });
    }

    fn fitnesses(&self) -> impl Iterator<Item = usize> + '_ {
        self.individuals
            .iter()
            .map(|c| c.fitness().expect("fitness computed for every individual"))
    }

    /// Total fitness across the current, fully evaluated generation.
    pub fn sum(&self) -> usize {
        self.fitnesses().sum()
    }

    pub fn mean(&self) -> f64 {
        self.sum() as f64 / self.len() as f64
    }

    /// Population standard deviation of fitness. Zero when every individual
    /// scores the same; the convergence check reads this as stagnation.
    pub fn std_dev(&self) -> f64 {
        let mean = self.mean();
        let variance = self
            .fitnesses()
            .map(|f| {
                let d = f as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / self.len() as f64;
        variance.sqrt()
    }

    /// The highest-fitness individual of the current generation. Ties go to
    /// the earliest individual, matching the stable descending sort used by
    /// selection.
    pub fn best(&self) -> &Cipher {
        self.individuals
            .iter()
            .reduce(|best, c| {
                let fit = |c: &Cipher| c.fitness().expect("fitness computed for every individual");
                if fit(c) > fit(best) {
                    c
                } else {
                    best
                }
            })
            .expect("population is never empty")
    }

    /// Save every individual to its own file inside the directory at `path`
    pub fn to_files<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        for (idx, cipher) in self.individuals.iter().enumerate() {
            cipher.to_file(path.as_ref().join(format!("{idx}.json")))?;
        }

        Ok(())
    }

    /// Load a population from individual files inside the directory at
    /// `path`. Assumes every file in `path` is a valid descriptor, and will
    /// parse it.
    pub fn from_files<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let individuals = read_dir(path)?
            .map(|fp| Cipher::from_file(fp?.path()))
            .collect::<Result<Vec<_>, _>>()?;

        if individuals.is_empty() {
            return Err("no ciphers".into());
        }

        Ok(Self {
            individuals,
            age: 0,
        })
    }
}
