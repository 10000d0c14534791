use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use amygdala::{softmax, LabelSet, ScoreInterpreter};

fn logits(n: usize) -> Vec<f32> {
    (0..n).map(|i| ((i * 7919) % 101) as f32 / 10.0 - 5.0).collect()
}

fn bench_softmax(c: &mut Criterion) {
    let mut group = c.benchmark_group("Softmax");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    for n in [2usize, 10, 1000, 32_000] {
        let input = logits(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| softmax(black_box(input.as_slice())).unwrap())
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("Classify");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    // Binary sentiment, the common case
    let binary = ScoreInterpreter::new(LabelSet::binary_sentiment());
    group.bench_function("binary", |b| b.iter(|| binary.classify(black_box(&[-2.0_f32, 2.0][..])).unwrap()));

    // Wide label set, e.g. a topic classifier
    let wide = ScoreInterpreter::new(LabelSet::new((0..1000).map(|i| format!("class_{}", i))).unwrap());
    let input = logits(1000);
    group.bench_function("1000_classes", |b| b.iter(|| wide.classify(black_box(input.as_slice())).unwrap()));

    group.finish();
}

criterion_group!(benches, bench_softmax, bench_classify);
criterion_main!(benches);
