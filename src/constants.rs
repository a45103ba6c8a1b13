//! Centralized constants for permevo evolution parameters.
//!
//! All configurable parameters are defined here with the `PERMEVO_` prefix.
//! This enables easy identification and future environment variable configuration.

use crate::random::percent;

// ============================================================================
// Cipher Parameters
// ============================================================================

/// Number of letters in the cipher alphabet
pub const PERMEVO_ALPHABET_LEN: usize = 26;

/// Length of every word in the lexicon and target set
pub const PERMEVO_WORD_LENGTH: usize = 6;

// ============================================================================
// Population Parameters
// ============================================================================

/// Number of individuals kept alive across generations
pub const PERMEVO_POPULATION_SIZE: usize = 50;

/// Number of lowest-fitness individuals discarded each generation
pub const PERMEVO_CULL_COUNT: usize = 15;

/// Number of top-fitness individuals eligible as crossover parents
pub const PERMEVO_PARENT_COUNT: usize = 5;

// ============================================================================
// Evolution Parameters
// ============================================================================

/// Hard cap on generations before the run terminates with its best effort
pub const PERMEVO_MAX_GENERATIONS: usize = 2000;

/// Probability of swapping two key positions in a new child
pub const PERMEVO_MUTATION_PROB: u64 = percent(1);

/// Fitness standard deviation below which a generation counts as stagnant
pub const PERMEVO_STD_DEV_CUTOFF: f64 = 5.0;

/// Number of consecutive stagnant generations before the run terminates
pub const PERMEVO_STAGNATION_WINDOW: usize = 10;
