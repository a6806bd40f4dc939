use criterion::{
    measurement::Measurement, BatchSize, BenchmarkGroup, BenchmarkId, Criterion, Throughput,
};
use interset::IntervalTreeSet;

use crate::Lfsr;

#[derive(Debug, Clone, Copy)]
struct BenchName {
    n_values: usize,
    n_lookups: usize,
}

impl From<BenchName> for BenchmarkId {
    fn from(v: BenchName) -> Self {
        Self::new(format!("{}_values_n_lookups", v.n_values), v.n_lookups)
    }
}

pub(super) fn bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("contains");

    // Set size
    for n_values in [1_000, 10_000] {
        // Number of interval lookups
        for n_lookups in [100, 1_000] {
            bench_param(&mut g, n_values, n_lookups)
        }
    }
}

/// For a set built from `n_values` random intervals, measure `n_lookups`
/// containment probes of further random intervals.
fn bench_param<M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize, n_lookups: usize)
where
    M: Measurement,
{
    // The set must be at least as big as the number of lookups.
    assert!(n_values >= n_lookups);

    // Generate the set.
    let mut rand = Lfsr::default();
    let mut t = IntervalTreeSet::default();

    for _i in 0..n_values {
        t.add(rand.next_interval());
    }

    let bench_name = BenchName {
        n_values,
        n_lookups,
    };

    g.throughput(Throughput::Elements(n_lookups as _)); // Lookups per second
    g.bench_function(BenchmarkId::from(bench_name), |b| {
        b.iter_batched(
            // Provide the LFSR state after the build phase so the probes
            // differ from the inserted intervals.
            || rand.clone(),
            |mut rand| {
                for _ in 0..n_lookups {
                    let probe = rand.next_interval();
                    std::hint::black_box(t.contains(&probe));
                    std::hint::black_box(t.intersects(&probe));
                }
            },
            BatchSize::SmallInput,
        )
    });
}
