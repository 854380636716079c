use bingo_engine::{
    GameConfig, GameState,
    game::{card::Card, win::evaluate},
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::StdRng};
use std::collections::HashSet;

/// Card of the given size plus a called set covering roughly half the pool
fn setup_card(grid_size: usize) -> (Card, HashSet<u32>) {
    let config = GameConfig {
        grid_size,
        max_number: (grid_size * grid_size * 3) as u32,
        ..GameConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(42);
    let card = Card::generate(&config, "bench", chrono::Utc::now(), &mut rng);
    let called = (1..=config.max_number).step_by(2).collect();
    (card, called)
}

/// Benchmark win evaluation across grid sizes
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    for size in [3usize, 5, 8] {
        let (card, called) = setup_card(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| evaluate(&card.numbers, &card.marks, &called));
        });
    }
    group.finish();
}

/// Benchmark card generation on the default 5x5 / 75 layout
fn bench_generate_card(c: &mut Criterion) {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("generate_card_5x5", |b| {
        b.iter(|| Card::generate(&config, "bench", chrono::Utc::now(), &mut rng));
    });
}

/// Benchmark rolling an entire 75-number pool
fn bench_roll_full_pool(c: &mut Criterion) {
    c.bench_function("roll_full_pool_75", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(9);
            let mut game = GameState::new("bench".to_string(), GameConfig::default());
            let _ = game.start();
            while game.roll(&mut rng).is_ok() {}
            game
        });
    });
}

criterion_group!(
    benches,
    bench_evaluate,
    bench_generate_card,
    bench_roll_full_pool
);
criterion_main!(benches);
