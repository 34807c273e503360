use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use prompt_bandit::services::Ucb1;

fn warmed_bandit(n_arms: usize, rounds: usize) -> Ucb1 {
    let mut bandit = Ucb1::new((0..n_arms).map(|i| format!("arm_{i}"))).unwrap();
    for r in 0..rounds {
        let arm = bandit.select().to_string();
        let reward = if arm.ends_with('0') { 0.9 } else { (r % 7) as f64 / 10.0 };
        bandit.update(&arm, reward).unwrap();
    }
    bandit
}

fn bench_select_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("ucb1_select_update");
    for n_arms in [4usize, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(n_arms), &n_arms, |b, &n| {
            let mut bandit = warmed_bandit(n, n * 4);
            b.iter(|| {
                let arm = bandit.select().to_string();
                bandit.update(black_box(&arm), black_box(0.5)).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_peek(c: &mut Criterion) {
    let bandit = warmed_bandit(16, 256);
    c.bench_function("ucb1_peek_16_arms", |b| b.iter(|| black_box(bandit.peek())));
}

criterion_group!(benches, bench_select_update, bench_peek);
criterion_main!(benches);
