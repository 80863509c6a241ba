use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use eda_correlation::{DagostinoPearson, NormalityTest, ShapiroWilk, StatisticalComparator};
use rand::prelude::*;
use rand_distr::Normal;

/// Generate normal data
fn generate_normal_data(size: usize, mean: f64, std: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(mean, std).unwrap();
    (0..size).map(|_| normal.sample(&mut rng)).collect()
}

fn bench_normality(c: &mut Criterion) {
    let mut group = c.benchmark_group("Normality");
    for size in [50, 500, 5000] {
        let data = generate_normal_data(size, 100.0, 15.0, 42);
        group.bench_with_input(BenchmarkId::new("shapiro_wilk", size), &data, |b, data| {
            b.iter(|| ShapiroWilk.test(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("dagostino_pearson", size), &data, |b, data| {
            b.iter(|| DagostinoPearson.test(black_box(data)))
        });
    }
    group.finish();
}

fn bench_comparator(c: &mut Criterion) {
    let mut group = c.benchmark_group("Comparator");
    let comparator = StatisticalComparator::default();
    for size in [100, 1000] {
        let x = generate_normal_data(size, 0.0, 1.0, 1);
        let y = generate_normal_data(size, 0.0, 1.0, 2);
        group.bench_with_input(BenchmarkId::new("compare", size), &(x, y), |b, (x, y)| {
            b.iter(|| comparator.compare(black_box(x), black_box(y)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normality, bench_comparator);
criterion_main!(benches);
