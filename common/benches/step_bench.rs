use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use snake_common::games::SessionRng;
use snake_common::games::snake::{BotController, SnakeGameState, SnakeSessionSettings};

fn play_autopilot_game(max_ticks: usize) -> u32 {
    let settings = SnakeSessionSettings::default();
    let mut state = SnakeGameState::new(&settings);
    let mut rng = SessionRng::new(42);

    for _ in 0..max_ticks {
        if let Some(direction) = BotController::calculate_move(&state, &mut rng) {
            state.request_direction(direction);
        }
        state.step(&mut rng);
        if state.is_terminal() {
            break;
        }
    }
    state.score()
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("snake");

    group.bench_function("autopilot_game_1000_ticks", |b| {
        b.iter(|| black_box(play_autopilot_game(black_box(1000))))
    });

    group.bench_function("single_step", |b| {
        let settings = SnakeSessionSettings::default();
        let mut rng = SessionRng::new(42);
        b.iter_batched(
            || SnakeGameState::new(&settings),
            |mut state| black_box(state.step(&mut rng)),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
