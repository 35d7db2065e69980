use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use keyloop::engine::TrigramModel;
use keyloop::generator::{generate_markov_text, generate_weakest_loop_text};

const CORPUS: &str = "the quick brown fox jumps over the lazy dog while \
                      quiet queens question the theory of thin things";

fn make_session(len: usize) -> (Vec<char>, Vec<f64>) {
    let text: Vec<char> = CORPUS.chars().cycle().take(len).collect();
    let mut t = 0.0;
    let timeline = (0..len)
        .map(|i| {
            t += 0.1 + (i % 7) as f64 * 0.02;
            t
        })
        .collect();
    (text, timeline)
}

fn trained_model(sessions: usize) -> TrigramModel {
    let mut model = TrigramModel::new();
    for _ in 0..sessions {
        let (text, timeline) = make_session(400);
        model.ingest(&text, &timeline, false).unwrap();
    }
    model
}

fn bench_ingest(c: &mut Criterion) {
    let (text, timeline) = make_session(1000);

    c.bench_function("ingest (1000 chars)", |b| {
        b.iter(|| {
            let mut model = TrigramModel::new();
            model
                .ingest(black_box(&text), black_box(&timeline), false)
                .unwrap();
            model
        })
    });
}

fn bench_ranking(c: &mut Criterion) {
    let model = trained_model(20);

    c.bench_function("ranked_trigrams", |b| {
        b.iter(|| black_box(&model).ranked_trigrams())
    });
}

fn bench_markov(c: &mut Criterion) {
    let model = trained_model(20);
    let mut rng = SmallRng::seed_from_u64(42);

    c.bench_function("markov text (100 chars)", |b| {
        b.iter(|| generate_markov_text(black_box(&model), 100, &mut rng).unwrap())
    });
}

fn bench_weakest_loop(c: &mut Criterion) {
    let model = trained_model(20);

    c.bench_function("weakest loop (50 chars)", |b| {
        b.iter(|| generate_weakest_loop_text(black_box(&model), 50).unwrap())
    });
}

criterion_group!(
    benches,
    bench_ingest,
    bench_ranking,
    bench_markov,
    bench_weakest_loop
);
criterion_main!(benches);
