pub mod cipher;
pub mod constants;
pub mod engine;
pub mod fitness;
pub mod lexicon;
pub mod population;
pub mod random;

pub use cipher::Cipher;
pub use engine::{Config, Evolution, Hook, Outcome, Stats, Verdict};
pub use fitness::Evaluator;
pub use lexicon::{alphabetical, Lexicon, WordList};
pub use population::Population;
pub use random::{Happens, Probabilities};
