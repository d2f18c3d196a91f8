use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use simple_classifier::dataset::{SynthesisOptions, synthesize};
use simple_classifier::ml::logreg::{FitOptions, fit};

const SAMPLE_COUNT: usize = 1_000;

fn bench_synthesize(c: &mut Criterion) {
    let options = SynthesisOptions::new(SAMPLE_COUNT, 20, 5, 5, 2, 42);
    c.bench_with_input(
        BenchmarkId::new("synthesize", SAMPLE_COUNT),
        &options,
        |b, options| {
            b.iter(|| synthesize(black_box(options)).expect("synthesize"));
        },
    );
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_ovr");
    for (features, classes) in [(2usize, 2usize), (20, 2), (20, 4)] {
        let options = SynthesisOptions {
            class_count: classes,
            ..SynthesisOptions::new(SAMPLE_COUNT, features, features.min(5), 0, 0, 42)
        };
        let data = synthesize(&options).expect("synthesize");
        let fit_options = FitOptions::default();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{features}x{classes}")),
            &data,
            |b, data| {
                b.iter(|| fit(black_box(data), &fit_options).expect("fit"));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_synthesize, bench_fit);
criterion_main!(benches);
