use core::ops::ControlFlow;
use permevo::{
    constants::PERMEVO_WORD_LENGTH,
    engine::{Config, Evolution},
    fitness::Evaluator,
    lexicon::WordList,
    random::{default_rng, ProbBinding, ProbStatic},
};
use std::process::exit;

fn main() {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: permevo <wordlist> <encoded word>...");
        exit(2);
    };
    let targets = args.collect::<Vec<_>>();
    if targets.is_empty() {
        eprintln!("usage: permevo <wordlist> <encoded word>...");
        exit(2);
    }

    for word in targets.iter() {
        if word.len() != PERMEVO_WORD_LENGTH || !word.bytes().all(|b| b.is_ascii_lowercase()) {
            eprintln!("{word}: expected {PERMEVO_WORD_LENGTH} lowercase letters");
            exit(1);
        }
    }

    let lexicon = match WordList::from_file(&path, PERMEVO_WORD_LENGTH) {
        Ok(lexicon) => lexicon,
        Err(err) => {
            eprintln!("{path}: {err}");
            exit(1);
        }
    };

    let evaluator = Evaluator::new(&targets, &lexicon);
    let mut rng = ProbBinding::new(ProbStatic::default(), default_rng());
    let outcome = Evolution::new(evaluator, Config::default())
        .with_hook(Box::new(|stats| {
            if stats.generation % 100 == 0 {
                println!(
                    "gen {}: best {} mean {:.2} sd {:.2}",
                    stats.generation, stats.best, stats.mean, stats.std_dev
                );
            }
            ControlFlow::Continue(())
        }))
        .evolve(&mut rng);

    println!(
        "{} ({:?}, fitness {}/{} after {} generations)",
        outcome.cipher,
        outcome.verdict,
        outcome.fitness,
        targets.len(),
        outcome.generations
    );
}
