use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use regrid_weights::prelude::*;

/// Bilinear-like operator from an `n x n` grid to an `(n/2) x (n/2)` grid:
/// every destination cell averages a 2x2 block of source cells.
fn coarsening_operator(n: usize) -> WeightOperator {
    let m = n / 2;
    let mut op = WeightOperator::new(m * m, n * n);
    for j in 0..m {
        for i in 0..m {
            let r = j * m + i;
            for (dj, di) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                op.push(r, (2 * j + dj) * n + 2 * i + di, 0.25);
            }
        }
    }
    op
}

fn field(batch: usize, n: usize) -> DenseField {
    let data = (0..batch * n * n).map(|i| (i % 97) as f64).collect();
    DenseField::new(vec![batch, n, n], data).expect("length matches")
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");

    for n in [64, 256].iter() {
        let op = coarsening_operator(*n);
        let data = field(8, *n);
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter(|| {
                apply(black_box(&op), black_box(&data), (n, n), (n / 2, n / 2))
                    .expect("shapes agree")
            });
        });
    }

    group.finish();
}

fn bench_inject_missing(c: &mut Criterion) {
    let mut group = c.benchmark_group("inject_missing");

    for n in [64, 256].iter() {
        // drop every other destination row so half the cells need markers
        let full = coarsening_operator(*n);
        let mut op = WeightOperator::new(full.n_out(), full.n_in());
        for (r, col, v) in full.entries().filter(|(r, _, _)| r % 2 == 0) {
            op.push(r, col, v);
        }
        group.bench_with_input(BenchmarkId::from_parameter(n), &op, |b, op| {
            b.iter(|| inject_missing(black_box(op)).expect("rows in range"));
        });
    }

    group.finish();
}

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine_columns");

    for n in [64, 256].iter() {
        let op = coarsening_operator(*n);
        // merge source cells pairwise
        let groups: Vec<usize> = (0..op.n_in()).map(|col| col / 2).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &groups, |b, groups| {
            b.iter(|| combine_columns(black_box(&op), black_box(groups)).expect("valid groups"));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply, bench_inject_missing, bench_combine);
criterion_main!(benches);
