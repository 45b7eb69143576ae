use criterion::{black_box, criterion_group, criterion_main, Criterion};
use natal_core::aspects::{AspectCalculator, AspectPoint};

fn bench_calculate_aspect(c: &mut Criterion) {
    let calculator = AspectCalculator::new();

    c.bench_function("calculate_aspect", |b| {
        b.iter(|| {
            calculator.calculate_aspect(
                black_box(100.0),
                black_box(102.0),
                black_box(Some(1.0)),
                black_box(Some(13.0)),
            )
        })
    });
}

fn bench_find_aspects(c: &mut Criterion) {
    let calculator = AspectCalculator::new();

    // Twelve points, same count as a full chart
    let points: Vec<AspectPoint> = (0..12)
        .map(|i| AspectPoint::new(format!("body_{}", i), (i as f64) * 29.5).with_speed(1.0))
        .collect();

    c.bench_function("find_aspects", |b| {
        b.iter(|| calculator.find_aspects(black_box(&points)))
    });
}

criterion_group!(benches, bench_calculate_aspect, bench_find_aspects);
criterion_main!(benches);
