use std::hint::black_box;

use criterion::{measurement::Measurement, BenchmarkGroup, BenchmarkId, Criterion, Throughput};
use interset::IntervalTreeSet;

use crate::Lfsr;

#[derive(Debug)]
struct BenchName {
    n_values: usize,
}

impl From<BenchName> for BenchmarkId {
    fn from(v: BenchName) -> Self {
        Self::new("n_values", v.n_values)
    }
}

pub(super) fn bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("iter");

    for n_values in [1, 100, 1_000, 10_000] {
        bench_param(&mut g, n_values)
    }
}

fn bench_param<M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
where
    M: Measurement,
{
    // Generate the set.
    let mut rand = Lfsr::default();
    let mut t = IntervalTreeSet::default();

    for _i in 0..n_values {
        t.add(rand.next_interval());
    }

    let bench_name = BenchName { n_values };

    // Stored intervals visited per second.
    g.throughput(Throughput::Elements(t.len() as _));
    g.bench_function(BenchmarkId::from(bench_name), |b| {
        b.iter(|| {
            for v in t.iter() {
                black_box(v);
            }
        })
    });
}
