use criterion::{black_box, criterion_group, criterion_main, Criterion};
use exact_oracle::{ContingencyTable, ExactEngine, PermutationTail};

fn bench_table_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_enumeration");
    group.sample_size(20);

    let tea = ContingencyTable::from_rows(&[[3u64, 1], [1, 3]]).unwrap();
    group.bench_function("fisher_2x2", |b| {
        b.iter(|| black_box(ExactEngine::new().fisher_exact(black_box(&tea)).unwrap().p_value));
    });

    // A few thousand tables; exercises the parallel split on the first cell.
    let wide = ContingencyTable::from_rows(&[[3u64, 2, 1, 4], [1, 2, 3, 0], [2, 2, 2, 3]]).unwrap();
    group.bench_function("fisher_3x4", |b| {
        b.iter(|| black_box(ExactEngine::new().fisher_exact(black_box(&wide)).unwrap().p_value));
    });

    group.bench_function("monte_carlo_3x4", |b| {
        let engine = ExactEngine::new().monte_carlo_replicates(2_000).seed(7);
        b.iter(|| black_box(engine.monte_carlo_fisher(black_box(&wide)).unwrap().p_value));
    });
    group.finish();
}

fn bench_permutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("permutation");
    let weights: Vec<u64> = (1..=14).collect();
    group.bench_function("signed_rank_n14", |b| {
        b.iter(|| black_box(PermutationTail::enumerate(black_box(&weights), 30).two_sided()));
    });
    group.bench_function("rank_sum_10_of_19", |b| {
        let pooled: Vec<u64> = (1..=19).collect();
        b.iter(|| black_box(PermutationTail::enumerate_subsets(black_box(&pooled), 10, 70).ratio()));
    });
    group.finish();
}

criterion_group!(benches, bench_table_enumeration, bench_permutation);
criterion_main!(benches);
