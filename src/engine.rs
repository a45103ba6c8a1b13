//! The generational loop: evaluate, check criteria, cull, recombine, mutate.

use crate::{
    cipher::Cipher,
    constants::{
        PERMEVO_CULL_COUNT, PERMEVO_MAX_GENERATIONS, PERMEVO_PARENT_COUNT,
        PERMEVO_POPULATION_SIZE, PERMEVO_STAGNATION_WINDOW, PERMEVO_STD_DEV_CUTOFF,
    },
    fitness::Evaluator,
    lexicon::Lexicon,
    population::Population,
    random::Happens,
};
use core::{cmp::Reverse, ops::ControlFlow};
use rand::{Rng, RngCore};

/// Tunables for one evolution run. A crossover pair must always be drawable,
/// so `parents` must be at least 2 and `cull` must leave at least two
/// survivors; [Evolution::new] enforces both.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Fixed population size, held constant across generations
    pub population: usize,
    /// Generation cap; reaching it is a normal terminal outcome
    pub max_generations: usize,
    /// How many of the lowest-fitness individuals to discard each generation
    pub cull: usize,
    /// How many of the highest-fitness individuals may parent offspring
    pub parents: usize,
    /// Fitness std dev below which a generation counts as stagnant
    pub std_dev_cutoff: f64,
    /// Consecutive stagnant generations before the run stops
    pub stagnation_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population: PERMEVO_POPULATION_SIZE,
            max_generations: PERMEVO_MAX_GENERATIONS,
            cull: PERMEVO_CULL_COUNT,
            parents: PERMEVO_PARENT_COUNT,
            std_dev_cutoff: PERMEVO_STD_DEV_CUTOFF,
            stagnation_window: PERMEVO_STAGNATION_WINDOW,
        }
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every target word decoded to a lexicon entry
    Solved,
    /// The generation cap was reached; the result is best-effort
    GenerationCap,
    /// Fitness spread stayed under the cutoff for the whole stagnation window
    Stagnated,
    /// A hook requested an early stop
    Halted,
}

/// The best decoding found, however the run ended.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub cipher: Cipher,
    pub fitness: usize,
    pub generations: usize,
    pub verdict: Verdict,
}

/// Per-generation summary handed to hooks.
#[derive(Debug, Clone, Copy)]
pub struct Stats {
    pub generation: usize,
    pub best: usize,
    pub mean: f64,
    pub std_dev: f64,
}

pub type Hook<'a> = Box<dyn FnMut(&Stats) -> ControlFlow<()> + 'a>;

/// Pick two distinct members of `pool` uniformly.
#[inline]
fn uniq_2<'a, T>(pool: &'a [T], rng: &mut impl RngCore) -> Option<(&'a T, &'a T)> {
    let len = pool.len();
    if len < 2 {
        None
    } else {
        let l = rng.random_range(0..len);
        let r = rng.random_range(0..len);
        if l == r {
            if r + 1 == len {
                Some((&pool[l], &pool[0]))
            } else {
                Some((&pool[l], &pool[r + 1]))
            }
        } else {
            Some((&pool[l], &pool[r]))
        }
    }
}

/// Drives a population of cipher candidates toward a key that decodes every
/// target word. Owns the population for the whole run; callers only see the
/// final [Outcome] and per-generation [Stats] through hooks.
pub struct Evolution<'a, L: Lexicon> {
    evaluator: Evaluator<'a, L>,
    config: Config,
    hooks: Vec<Hook<'a>>,
}

impl<'a, L: Lexicon> Evolution<'a, L> {
    /// Panics if `config` cannot sustain recombination: fewer than two
    /// parents, or a cull that leaves fewer than two survivors.
    pub fn new(evaluator: Evaluator<'a, L>, config: Config) -> Self {
        assert!(config.parents >= 2, "config needs at least two parents");
        assert!(
            config.population.saturating_sub(config.cull) >= 2,
            "cull leaves fewer than two survivors"
        );
        Self {
            evaluator,
            config,
            hooks: Vec::new(),
        }
    }

    /// Register a hook called once per generation, after evaluation. A hook
    /// returning `ControlFlow::Break` stops the run with [Verdict::Halted].
    pub fn with_hook(mut self, hook: Hook<'a>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Run to a terminal state. Deterministic for a given seeded rng.
    pub fn evolve(mut self, rng: &mut (impl RngCore + Happens)) -> Outcome {
        let mut population = Population::init(self.config.population, rng);
        let mut stagnant = 0;

        loop {
            population.evaluate(&self.evaluator);

            let stats = Stats {
                generation: population.age,
                best: population
                    .best()
                    .fitness()
                    .expect("population was just evaluated"),
                mean: population.mean(),
                std_dev: population.std_dev(),
            };

            let mut halted = false;
            for hook in self.hooks.iter_mut() {
                if hook(&stats).is_break() {
                    halted = true;
                }
            }

            if stats.std_dev < self.config.std_dev_cutoff {
                stagnant += 1;
            } else {
                stagnant = 0;
            }

            let verdict = if stats.best == self.evaluator.target_count() {
                Some(Verdict::Solved)
            } else if halted {
                Some(Verdict::Halted)
            } else if population.age >= self.config.max_generations {
                Some(Verdict::GenerationCap)
            } else if stagnant >= self.config.stagnation_window {
                Some(Verdict::Stagnated)
            } else {
                None
            };

            if let Some(verdict) = verdict {
                return Outcome {
                    cipher: population.best().clone(),
                    fitness: stats.best,
                    generations: population.age,
                    verdict,
                };
            }

            self.select(&mut population);
            self.recombine(&mut population, rng);
            population.age += 1;
        }
    }

    /// Rank by fitness descending and discard the `cull` lowest.
    fn select(&self, population: &mut Population) {
        population.individuals.sort_by_cached_key(|c| {
            Reverse(c.fitness().expect("fitness computed for every individual"))
        });
        let keep = population.len().saturating_sub(self.config.cull).max(1);
        population.individuals.truncate(keep);
    }

    /// Refill to the fixed size. Each child comes from two distinct parents
    /// drawn uniformly from the elite pool, then is offered one mutation.
    fn recombine(&self, population: &mut Population, rng: &mut (impl RngCore + Happens)) {
        let pool = self.config.parents.min(population.len());
        let mut children = Vec::with_capacity(self.config.population.saturating_sub(population.len()));

        while population.len() + children.len() < self.config.population {
            let (l, r) = uniq_2(&population.individuals[..pool], rng)
                .expect("parent pool holds at least two ciphers");
            let mut child = l.crossover(r, rng);
            child.mutate(rng);
            children.push(child);
        }

        population.individuals.append(&mut children);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        lexicon::WordList,
        random::{percent, EvolutionEvent, ProbBinding, ProbStatic, WyRng},
    };

    fn rng(seed: u64) -> ProbBinding<ProbStatic, WyRng> {
        ProbBinding::new(ProbStatic::default(), WyRng::seeded(seed))
    }

    fn targets(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_uniq_2() {
        let mut rng = rng(42);
        assert_eq!(uniq_2::<usize>(&[], &mut rng), None);
        assert_eq!(uniq_2(&[&1], &mut rng), None);

        for _ in 0..10_000 {
            let (l, r) = uniq_2(&[1, 2], &mut rng).unwrap();
            if *l == 1 {
                assert_eq!(*r, 2);
            } else {
                assert_eq!(*r, 1);
                assert_eq!(*l, 2);
            }
        }

        let pool = (0..100).collect::<Vec<usize>>();
        for _ in 0..10_000 {
            let (l, r) = uniq_2(&pool, &mut rng).unwrap();
            assert_ne!(*l, *r)
        }
    }

    #[test]
    #[should_panic(expected = "at least two parents")]
    fn test_new_rejects_single_parent() {
        let targets = targets(&["aaaaaa"]);
        let lexicon = WordList::new(Vec::<&str>::new());
        let config = Config {
            parents: 1,
            ..Config::default()
        };
        let _ = Evolution::new(Evaluator::new(&targets, &lexicon), config);
    }

    #[test]
    #[should_panic(expected = "fewer than two survivors")]
    fn test_new_rejects_total_cull() {
        let targets = targets(&["aaaaaa"]);
        let lexicon = WordList::new(Vec::<&str>::new());
        let config = Config {
            population: 10,
            cull: 9,
            ..Config::default()
        };
        let _ = Evolution::new(Evaluator::new(&targets, &lexicon), config);
    }

    #[test]
    fn test_config_default_matches_constants() {
        let config = Config::default();
        assert_eq!(config.population, 50);
        assert_eq!(config.max_generations, 2000);
        assert_eq!(config.cull, 15);
        assert_eq!(config.parents, 5);
        assert_eq!(config.stagnation_window, 10);
    }

    #[test]
    fn test_select_and_recombine_hold_size() {
        let config = Config::default();
        let targets = targets(&["aaaaaa"]);
        let lexicon = WordList::new(["aaaaaa"]);
        let engine = Evolution::new(Evaluator::new(&targets, &lexicon), config);

        let mut rng = rng(42);
        let mut population = Population::init(config.population, &mut rng);
        population.evaluate(&engine.evaluator);

        engine.select(&mut population);
        assert_eq!(population.len(), config.population - config.cull);

        engine.recombine(&mut population, &mut rng);
        assert_eq!(population.len(), config.population);
        for cipher in population.individuals.iter() {
            assert!(cipher.is_permutation());
        }
    }

    #[test]
    fn test_select_keeps_fittest() {
        let config = Config::default();
        let targets = targets(&["aaaaaa"]);
        let lexicon = WordList::new(["aaaaaa"]);
        let engine = Evolution::new(Evaluator::new(&targets, &lexicon), config);

        let mut rng = rng(7);
        let mut population = Population::init(config.population, &mut rng);
        population.evaluate(&engine.evaluator);
        let best = population.best().clone();

        engine.select(&mut population);
        assert_eq!(population.individuals[0], best);
    }

    #[test]
    fn test_evolve_solves_identity_targets() {
        // encoded under the identity key, so the lexicon holds the
        // ciphertext verbatim and a perfect key is reachable
        let targets = targets(&["aaaaaa", "bbbbbb", "cccccc"]);
        let lexicon = WordList::new(["aaaaaa", "bbbbbb", "cccccc"]);
        let config = Config {
            population: 100,
            cull: 60,
            max_generations: 200,
            // fitness tops out at 3, so spread never clears the default
            // cutoff; disable stagnation for this run
            std_dev_cutoff: 0.,
            ..Config::default()
        };

        // a hot mutation rate keeps the bound comfortable for one seed
        let mut rng = ProbBinding::new(
            ProbStatic::default().with_overrides(&[(EvolutionEvent::Mutate, percent(80))]),
            WyRng::seeded(42),
        );
        let outcome = Evolution::new(Evaluator::new(&targets, &lexicon), config).evolve(&mut rng);

        assert_eq!(outcome.verdict, Verdict::Solved);
        assert_eq!(outcome.fitness, 3);
        assert!(outcome.generations < 200);
        assert!(outcome.cipher.is_permutation());
        for word in targets.iter() {
            assert!(lexicon.contains(&outcome.cipher.apply(word)));
        }
    }

    #[test]
    fn test_evolve_generation_cap() {
        // an empty lexicon means no key can ever score; any other fixture
        // risks a lucky key decoding a target into it
        let targets = targets(&["aaaaaa", "bbbbbb"]);
        let lexicon = WordList::new(Vec::<&str>::new());
        let config = Config {
            max_generations: 1,
            std_dev_cutoff: 0.,
            ..Config::default()
        };

        let mut rng = rng(42);
        let outcome = Evolution::new(Evaluator::new(&targets, &lexicon), config).evolve(&mut rng);

        assert_eq!(outcome.verdict, Verdict::GenerationCap);
        assert_eq!(outcome.fitness, 0);
        assert_eq!(outcome.generations, 1);
    }

    #[test]
    fn test_evolve_stagnation() {
        // an empty lexicon never matches, so every fitness is 0 and the
        // spread sits under the cutoff from the first generation on
        let targets = targets(&["aaaaaa"]);
        let lexicon = WordList::new(Vec::<&str>::new());
        let config = Config {
            stagnation_window: 10,
            ..Config::default()
        };

        let mut rng = rng(42);
        let outcome = Evolution::new(Evaluator::new(&targets, &lexicon), config).evolve(&mut rng);

        assert_eq!(outcome.verdict, Verdict::Stagnated);
        assert_eq!(outcome.fitness, 0);
        assert_eq!(outcome.generations, 9);
    }

    #[test]
    fn test_hook_halts() {
        let targets = targets(&["aaaaaa"]);
        let lexicon = WordList::new(Vec::<&str>::new());
        let mut seen = Vec::new();

        let mut rng = rng(42);
        let outcome = Evolution::new(Evaluator::new(&targets, &lexicon), Config::default())
            .with_hook(Box::new(|stats| {
                seen.push(stats.generation);
                if stats.generation == 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }))
            .evolve(&mut rng);

        assert_eq!(outcome.verdict, Verdict::Halted);
        assert_eq!(outcome.generations, 3);
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
