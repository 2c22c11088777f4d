use criterion::{Criterion, black_box, criterion_group, criterion_main};
use planwarden::core::ledger::parse_review_ledger;

/// Benchmark review ledger extraction over realistic plan sizes.
fn bench_ledger_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_parse");

    let mut plan = String::from("# Migration plan\n\n");
    for i in 0..400 {
        plan.push_str(&format!("- step {i}: touch module {}\n", i % 17));
    }
    let with_ledger = format!("{plan}\n## Plan Review Status\nReviews: 2/3\nStatus: APPROVED\n");

    group.bench_function("no_ledger", |b| {
        b.iter(|| parse_review_ledger(black_box(&plan)));
    });

    group.bench_function("trailing_ledger", |b| {
        b.iter(|| parse_review_ledger(black_box(&with_ledger)));
    });

    group.finish();
}

criterion_group!(benches, bench_ledger_parse);
criterion_main!(benches);
