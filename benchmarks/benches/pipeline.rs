use benchmarks::data::{synthetic_application, synthetic_raw_csv};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use loan_approval::model::ForestParams;
use loan_approval::{CleanedTable, Predictor, Preprocessor, RawTable, Trainer};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn cleaned_table(rows: usize) -> CleanedTable {
    let raw = RawTable::from_reader(synthetic_raw_csv(rows, 42).as_bytes())
        .expect("synthetic table should parse");
    Preprocessor::new()
        .clean(&raw)
        .expect("synthetic table should clean")
}

fn bench_clean(c: &mut Criterion) {
    for size in [100, 1000, 10000].iter() {
        let raw = RawTable::from_reader(synthetic_raw_csv(*size, 42).as_bytes())
            .expect("synthetic table should parse");
        let preprocessor = Preprocessor::new();
        c.bench_with_input(BenchmarkId::new("clean", size), &raw, |b, raw| {
            b.iter(|| {
                let cleaned = preprocessor.clean(black_box(raw)).unwrap();
                black_box(cleaned);
            });
        });
    }
}

fn bench_train(c: &mut Criterion) {
    let mut group = c.benchmark_group("train");
    group.sample_size(10);
    for size in [500, 2000].iter() {
        let table = cleaned_table(*size);
        let trainer = Trainer::builder()
            .forest(ForestParams {
                n_estimators: 20,
                ..ForestParams::default()
            })
            .build()
            .expect("valid trainer");
        group.bench_with_input(BenchmarkId::new("forest_20_trees", size), &table, |b, t| {
            b.iter(|| {
                let model = trainer.fit(black_box(t)).unwrap();
                black_box(model);
            });
        });
    }
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let model = Trainer::builder()
        .build()
        .and_then(|trainer| trainer.fit(&cleaned_table(1000)))
        .expect("Failed to fit model");
    let predictor = Predictor::from_model(model, None);
    let mut rng = StdRng::seed_from_u64(7);
    let application = synthetic_application(&mut rng);

    c.bench_function("predict_single", |b| {
        b.iter(|| {
            let prediction = predictor.predict(black_box(&application)).unwrap();
            black_box(prediction);
        });
    });
}

criterion_group!(benches, bench_clean, bench_train, bench_predict);
criterion_main!(benches);
