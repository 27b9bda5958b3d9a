//! Combat consumer loop
//!
//! Pops one fight request at a time, looks both participants up in the
//! registry and resolves the fight with dice. An empty pop is just another
//! iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::Rng;

use crate::combat::resolution::{resolve_fight, FightOutcome};
use crate::ecs::registry::EntityRegistry;
use crate::simulation::queue::{FightQueue, FightTask};

/// Counters kept by the combat loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatStats {
    pub resolved: u64,
    pub kills: u64,
    pub discarded: u64,
}

impl CombatStats {
    pub fn record(&mut self, outcome: FightOutcome) {
        match outcome {
            FightOutcome::Discarded => self.discarded += 1,
            FightOutcome::Resolved { win, .. } => {
                self.resolved += 1;
                if win {
                    self.kills += 1;
                }
            }
        }
    }
}

/// Resolve one queued request
///
/// An id that is no longer in the registry counts as a dead participant.
pub fn process_task<R: Rng + ?Sized>(
    registry: &EntityRegistry,
    task: FightTask,
    rng: &mut R,
    dice_sides: u32,
) -> FightOutcome {
    let (Some(attacker), Some(defender)) = (registry.get(task.attacker), registry.get(task.defender))
    else {
        return FightOutcome::Discarded;
    };

    let outcome = resolve_fight(&attacker, &defender, rng, dice_sides);
    if outcome.is_kill() {
        tracing::info!("{} killed {}", attacker.name(), defender.name());
    }
    outcome
}

/// Consume fight requests until `running` is cleared
pub fn combat_loop(
    registry: &EntityRegistry,
    queue: &FightQueue,
    running: &AtomicBool,
    wait: Duration,
    dice_sides: u32,
) -> CombatStats {
    let mut rng = rand::thread_rng();
    let mut stats = CombatStats::default();

    while running.load(Ordering::Acquire) {
        let Some(task) = queue.pop_timeout(wait, running) else {
            continue;
        };
        stats.record(process_task(registry, task, &mut rng, dice_sides));
    }

    stats
}
