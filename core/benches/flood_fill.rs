use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use sapper_core::*;
use std::hint::black_box;

fn open_board(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood_fill");

    for size in [16, 64, Coord::MAX] {
        group.bench_function(format!("empty_{size}x{size}"), |b| {
            b.iter_batched(
                || GameSession::with_board(Board::generate(size, size).unwrap(), None),
                |mut session| black_box(session.reveal((0, 0)).unwrap()),
                BatchSize::LargeInput,
            )
        });
    }

    group.bench_function("large_easy_opening", |b| {
        let config = GameConfig::from_presets(SizePreset::Large, Difficulty::Easy);
        let mut seed = 0;
        b.iter_batched(
            || {
                seed += 1;
                GameSession::new(config, seed).unwrap()
            },
            |mut session| black_box(session.reveal((15, 25)).unwrap()),
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, open_board);
criterion_main!(benches);
