//! Storage benchmark: publish and load the model artifact.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use motion_guard::dataset::DatasetBuilder;
use motion_guard::storage::ModelStore;
use motion_guard::synth::SessionGenerator;
use motion_guard::train::Trainer;
use tempfile::tempdir;

fn bench_publish_and_load(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let store = ModelStore::new(dir.path().join("model.json"));
    let sessions = SessionGenerator::new(42).corpus(50, 50);
    let table = DatasetBuilder::new().build(&sessions).unwrap();
    let (model, _) = Trainer::default().train(&table, 0.3, 42).unwrap();

    c.bench_function("model_publish", |b| {
        b.iter(|| store.publish(black_box(&model)).unwrap())
    });

    store.publish(&model).unwrap();
    c.bench_function("model_load", |b| b.iter(|| black_box(store.load()).unwrap()));
}

criterion_group!(benches, bench_publish_and_load);
criterion_main!(benches);
