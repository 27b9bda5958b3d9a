//! Movement and proximity scheduler
//!
//! Each tick walks the registry under its shared lock. A living entity with
//! a move reach takes one random step (each axis independently -1, 0 or +1,
//! times the reach) clamped to the map. A living entity with a kill reach
//! then queues a fight against every other living entity in range. Both
//! A→B and B→A can be queued in the same tick; the combat loop sorts it out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::core::types::Position;
use crate::ecs::registry::EntityRegistry;
use crate::entity::npc::Entity;
use crate::simulation::queue::{FightQueue, FightTask};

/// What one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub moved: usize,
    pub enqueued: usize,
}

/// Take one random step; returns whether the entity moves at all
pub fn step<R: Rng + ?Sized>(entity: &Entity, rng: &mut R, map_size: i32) -> bool {
    let reach = entity.move_reach();
    if reach == 0 || !entity.is_alive() {
        return false;
    }

    let dx = rng.gen_range(-1..=1);
    let dy = rng.gen_range(-1..=1);
    let current = entity.position();
    let next = Position::new(current.x + dx * reach, current.y + dy * reach).clamped(map_size);
    entity.set_position(next.x, next.y);
    true
}

/// Queue a fight for every living target within the entity's kill reach
pub fn scan_targets(entity: &Entity, members: &[Arc<Entity>], queue: &FightQueue) -> usize {
    let reach = entity.kill_reach();
    if reach <= 0 || !entity.is_alive() {
        return 0;
    }

    let mut enqueued = 0;
    for other in members {
        if other.id() == entity.id() || !other.is_alive() {
            continue;
        }
        if entity.is_close(other, reach as u32) {
            queue.push(FightTask::new(entity.id(), other.id()));
            enqueued += 1;
        }
    }
    enqueued
}

/// One scheduler tick over the whole registry
pub fn run_tick<R: Rng + ?Sized>(
    registry: &EntityRegistry,
    queue: &FightQueue,
    rng: &mut R,
    map_size: i32,
) -> TickSummary {
    registry.with_members(|members| {
        let mut summary = TickSummary::default();
        for entity in members.iter().filter(|e| e.is_alive()) {
            if step(entity, rng, map_size) {
                summary.moved += 1;
            }
            summary.enqueued += scan_targets(entity, members, queue);
        }
        summary
    })
}

/// Tick every `interval` until `running` is cleared; returns the tick count
pub fn movement_loop(
    registry: &EntityRegistry,
    queue: &FightQueue,
    running: &AtomicBool,
    interval: Duration,
    map_size: i32,
) -> u64 {
    let mut rng = rand::thread_rng();
    let mut ticks = 0;

    while running.load(Ordering::Acquire) {
        let summary = run_tick(registry, queue, &mut rng, map_size);
        ticks += 1;
        tracing::trace!(
            tick = ticks,
            moved = summary.moved,
            enqueued = summary.enqueued,
            "movement tick"
        );
        thread::sleep(interval);
    }

    ticks
}
