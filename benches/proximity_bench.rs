//! Proximity scan and batch sweep benchmarks

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skirmish::combat::{fight_band, run_bands};
use skirmish::core::COORD_MAX;
use skirmish::ecs::EntityRegistry;
use skirmish::entity::{Entity, NpcFactory};
use skirmish::simulation::{run_tick, FightQueue};

fn population(count: usize) -> Vec<Entity> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    NpcFactory::silent().spawn_random(&mut rng, count, COORD_MAX)
}

fn bench_movement_tick(c: &mut Criterion) {
    let registry = EntityRegistry::new();
    registry.extend(population(500));
    let queue = FightQueue::new();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    c.bench_function("movement_tick_500", |b| {
        b.iter(|| {
            let summary = run_tick(&registry, &queue, &mut rng, 100);
            queue.drain();
            black_box(summary)
        })
    });
}

fn bench_fight_band(c: &mut Criterion) {
    let entities: Vec<Arc<Entity>> = population(200).into_iter().map(Arc::new).collect();

    c.bench_function("fight_band_200", |b| {
        b.iter(|| black_box(fight_band(&entities, black_box(60))))
    });
}

fn bench_batch_sweep(c: &mut Criterion) {
    c.bench_function("batch_sweep_100", |b| {
        b.iter(|| {
            let registry = EntityRegistry::new();
            registry.extend(population(100));
            black_box(run_bands(&registry, &[20, 40, 60, 80, 100]))
        })
    });
}

criterion_group!(benches, bench_movement_tick, bench_fight_band, bench_batch_sweep);
criterion_main!(benches);
