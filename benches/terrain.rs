use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use emberwild::world::dungeon::generate_dungeon;
use emberwild::world::trail::generate_trail;
use emberwild::world::{height, is_underwater, load_map, MapId};
use emberwild::GameConfig;

fn bench_terrain(c: &mut Criterion) {
    c.bench_function("height_grid_80x80", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for z in -40..40 {
                for x in -40..40 {
                    sum += height(black_box(x as f32 * 0.5), black_box(z as f32 * 0.5));
                }
            }
            sum
        })
    });

    c.bench_function("is_underwater_grid_80x80", |b| {
        b.iter(|| {
            let mut wet = 0;
            for z in -40..40 {
                for x in -40..40 {
                    if is_underwater(black_box(x as f32 * 0.5), black_box(z as f32 * 0.5)) {
                        wet += 1;
                    }
                }
            }
            wet
        })
    });
}

fn bench_generation(c: &mut Criterion) {
    c.bench_function("generate_trail", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| generate_trail(black_box(40.0), &mut rng))
    });

    c.bench_function("generate_dungeon_50", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| generate_dungeon(black_box(50), black_box(0.3), &mut rng))
    });

    let config = GameConfig::default();
    c.bench_function("load_overworld", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| load_map(MapId::Overworld, &config, &mut rng))
    });
}

criterion_group!(benches, bench_terrain, bench_generation);
criterion_main!(benches);
