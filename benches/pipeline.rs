//! Pipeline benchmark: feature extraction, dataset build and training over synthetic sessions.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use motion_guard::dataset::DatasetBuilder;
use motion_guard::features::FeatureExtractor;
use motion_guard::model::ForestParams;
use motion_guard::synth::SessionGenerator;
use motion_guard::train::Trainer;

fn bench_extract_single(c: &mut Criterion) {
    let session = SessionGenerator::new(1).human(1);
    let extractor = FeatureExtractor::new();

    c.bench_function("extract_human_session", |b| {
        b.iter(|| extractor.extract_session(black_box(&session)).unwrap())
    });
}

fn bench_build_dataset(c: &mut Criterion) {
    let sessions = SessionGenerator::new(42).corpus(50, 50);
    let builder = DatasetBuilder::new();

    c.bench_function("build_dataset_100_sessions", |b| {
        b.iter(|| builder.build(black_box(&sessions)).unwrap())
    });
}

fn bench_train(c: &mut Criterion) {
    let sessions = SessionGenerator::new(42).corpus(50, 50);
    let table = DatasetBuilder::new().build(&sessions).unwrap();

    let mut g = c.benchmark_group("train");
    g.sample_size(10);
    for parallel in [false, true] {
        let trainer = Trainer::new(ForestParams {
            parallel,
            ..ForestParams::default()
        });
        let name = if parallel { "parallel_100_trees" } else { "sequential_100_trees" };
        g.bench_function(name, |b| {
            b.iter(|| trainer.train(black_box(&table), 0.3, 42).unwrap())
        });
    }
    g.finish();
}

criterion_group!(benches, bench_extract_single, bench_build_dataset, bench_train);
criterion_main!(benches);
