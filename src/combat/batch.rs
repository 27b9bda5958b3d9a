//! Offline batch sweep
//!
//! No dice here: the dominance matrix alone decides. The whole population is
//! swept once per distance band. A defender killed in a band is only put on
//! that band's dead list; it stays in the population, and can still attack,
//! until the band ends. Which fights actually run therefore depends on the
//! iteration order over the population.

use std::sync::Arc;

use ahash::AHashSet;
use serde::Serialize;

use crate::combat::dominance::dominates;
use crate::core::types::EntityId;
use crate::ecs::registry::EntityRegistry;
use crate::entity::npc::{Entity, EntityView};

/// Sweep one band and return the dead list, in kill order
///
/// Every in-range pair whose defender is not yet on the dead list is
/// reported to the attacker's observers.
pub fn fight_band(entities: &[Arc<Entity>], distance: u32) -> Vec<EntityId> {
    let mut dead: Vec<EntityId> = Vec::new();
    let mut slated: AHashSet<EntityId> = AHashSet::new();

    for attacker in entities {
        for defender in entities {
            if attacker.id() == defender.id()
                || !attacker.is_close(defender, distance)
                || slated.contains(&defender.id())
            {
                continue;
            }

            let win = dominates(attacker.kind(), defender.kind());
            attacker.notify_fight(defender, win);

            if win {
                slated.insert(defender.id());
                dead.push(defender.id());
            }
        }
    }

    dead
}

/// Casualties of one band
#[derive(Debug, Clone, Serialize)]
pub struct BandReport {
    pub distance: u32,
    pub casualties: Vec<EntityView>,
}

/// Result of a full sweep
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub bands: Vec<BandReport>,
    pub survivors: Vec<EntityView>,
}

impl BatchReport {
    pub fn casualty_count(&self) -> usize {
        self.bands.iter().map(|b| b.casualties.len()).sum()
    }
}

/// Sweep `bands` in order, killing and pruning after each band
///
/// Stops early once the registry is empty.
pub fn run_bands(registry: &EntityRegistry, bands: &[u32]) -> BatchReport {
    let mut reports = Vec::with_capacity(bands.len());

    for &distance in bands {
        if registry.is_empty() {
            break;
        }

        let entities = registry.entities();
        let dead = fight_band(&entities, distance);

        let mut casualties = Vec::with_capacity(dead.len());
        for id in dead {
            if let Some(entity) = registry.get(id) {
                entity.make_dead();
                casualties.push(entity.view());
            }
        }
        let pruned = registry.prune_dead();

        tracing::debug!(distance, casualties = pruned, "band resolved");
        reports.push(BandReport {
            distance,
            casualties,
        });
    }

    BatchReport {
        bands: reports,
        survivors: registry.snapshot(),
    }
}
