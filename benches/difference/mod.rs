use criterion::{measurement::Measurement, BenchmarkGroup, BenchmarkId, Criterion, Throughput};
use interset::{Interval, IntervalTreeSet};

use crate::Lfsr;

#[derive(Debug, Clone, Copy)]
struct BenchName {
    n_values: usize,
}

impl From<BenchName> for BenchmarkId {
    fn from(v: BenchName) -> Self {
        Self::new("n_values", v.n_values)
    }
}

pub(super) fn bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("difference");

    for n_values in [100, 1_000, 10_000] {
        bench_param(&mut g, n_values)
    }
}

/// Measure the complement of a probe spanning the middle half of the value
/// domain against a set built from `n_values` random intervals.
fn bench_param<M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
where
    M: Measurement,
{
    let mut rand = Lfsr::default();
    let mut t = IntervalTreeSet::default();

    for _i in 0..n_values {
        t.add(rand.next_interval());
    }

    let probe = Interval::bounded(u16::MAX as u32 / 4, (u16::MAX as u32 / 4) * 3).unwrap();

    let bench_name = BenchName { n_values };
    g.throughput(Throughput::Elements(1));
    g.bench_function(BenchmarkId::from(bench_name), |b| {
        b.iter(|| std::hint::black_box(t.difference(&probe)))
    });
}
