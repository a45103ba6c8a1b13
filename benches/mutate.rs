use criterion::Criterion;
use permevo::{
    cipher::Cipher,
    random::{default_rng, percent, EvolutionEvent, ProbBinding, ProbStatic},
};

fn bench_mutate(bench: &mut Criterion) {
    let mut rng = ProbBinding::new(ProbStatic::default(), default_rng());
    let mut cipher = Cipher::random(&mut rng);

    bench.bench_function("mutate-default", |b| b.iter(|| cipher.mutate(&mut rng)));

    let mut always = ProbBinding::new(
        ProbStatic::default().with_overrides(&[(EvolutionEvent::Mutate, percent(100))]),
        default_rng(),
    );
    bench.bench_function("mutate-always", |b| b.iter(|| cipher.mutate(&mut always)));
}

pub fn benches() {
    #[cfg(not(feature = "smol_bench"))]
    let mut criterion: criterion::Criterion<_> = Criterion::default()
        .sample_size(1000)
        .significance_level(0.1);
    #[cfg(feature = "smol_bench")]
    let mut criterion: criterion::Criterion<_> = {
        use core::time::Duration;
        Criterion::default()
            .measurement_time(Duration::from_millis(1))
            .sample_size(10)
            .nresamples(1)
            .without_plots()
            .configure_from_args()
    };
    bench_mutate(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}
