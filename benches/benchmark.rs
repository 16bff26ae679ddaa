use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sepsis_survival::{
    Classifier, KnnClassifier, PatientRecord, ReportWriter, RunContext, evaluate_records, train_test_split,
};

fn synthetic_patients(n: usize) -> Vec<PatientRecord> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| {
            PatientRecord::new(
                rng.random_range(0..100) as f64,
                rng.random_range(0..2),
                rng.random_range(1..6),
                rng.random_range(0..2),
            )
        })
        .collect()
}

fn fitted(records: &[PatientRecord]) -> KnnClassifier {
    let projections = train_test_split(records, 0.2, 0).unwrap().projections();
    let mut knn = KnnClassifier::new(1);
    knn.fit(projections.train_features.view(), projections.train_labels.view())
        .unwrap();
    knn
}

fn bench_predict_single(c: &mut Criterion) {
    let records = synthetic_patients(10_000);
    let knn = fitted(&records);
    let query = PatientRecord::new(47.0, 1, 2, 1).features();

    let predict = knn.predictor().unwrap();

    c.bench_function("predict 47 year old female", |b| {
        b.iter(|| {
            let _ = predict(&query);
        })
    });
}

fn bench_replay(c: &mut Criterion) {
    let records = synthetic_patients(1_000);
    let knn = fitted(&records);
    let dir = tempfile::TempDir::new().unwrap();

    c.bench_function("replay 1k patients", |b| {
        b.iter(|| {
            let ctx = RunContext::start(dir.path(), "Bench");
            let _ = evaluate_records(&records, &knn, &ReportWriter::new(&ctx));
            let _ = std::fs::remove_file(ctx.report_path());
        });
    });
}

criterion_group!(benches, bench_predict_single, bench_replay);
criterion_main!(benches);
