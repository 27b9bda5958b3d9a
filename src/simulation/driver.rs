//! Simulation driver
//!
//! Owns the two worker threads. `Simulation::start` spawns the movement and
//! combat loops and hands back a `SimulationHandle`; `SimulationHandle::stop`
//! clears the running flag, wakes the combat loop and joins both threads.
//! Once `stop` returns nothing mutates the registry any more.
//! `Simulation::run` wraps the whole lifecycle with periodic rendering and a
//! wall-clock budget.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use rand::Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::ecs::registry::EntityRegistry;
use crate::entity::factory::NpcFactory;
use crate::entity::npc::EntityView;
use crate::render::{render_census, render_map};
use crate::simulation::combat_loop::{combat_loop, CombatStats};
use crate::simulation::movement::movement_loop;
use crate::simulation::queue::FightQueue;

/// Counters collected when the workers stop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    pub movement_ticks: u64,
    pub combat: CombatStats,
    /// Requests still queued when the combat loop exited
    pub abandoned: usize,
}

/// Result of a complete timed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub shutdown: ShutdownReport,
    pub survivors: Vec<EntityView>,
}

pub struct Simulation {
    config: SimulationConfig,
    registry: Arc<EntityRegistry>,
    queue: Arc<FightQueue>,
}

impl Simulation {
    pub fn new(config: SimulationConfig, registry: Arc<EntityRegistry>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry,
            queue: Arc::new(FightQueue::new()),
        })
    }

    /// Build a simulation with `config.population` random NPCs on the map
    pub fn populate<R: Rng + ?Sized>(
        config: SimulationConfig,
        factory: &NpcFactory,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;
        let registry = Arc::new(EntityRegistry::new());
        let spawned = factory.spawn_random(rng, config.population, config.map_size - 1);
        let inserted = registry.extend(spawned);
        tracing::info!("Created {} NPCs", inserted);
        Self::new(config, registry)
    }

    pub fn registry(&self) -> &Arc<EntityRegistry> {
        &self.registry
    }

    pub fn queue(&self) -> &Arc<FightQueue> {
        &self.queue
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Spawn the movement and combat threads
    pub fn start(&self) -> Result<SimulationHandle> {
        let running = Arc::new(AtomicBool::new(true));

        let movement = {
            let registry = self.registry.clone();
            let queue = self.queue.clone();
            let running = running.clone();
            let interval = self.config.move_interval;
            let map_size = self.config.map_size;
            thread::Builder::new()
                .name("movement".into())
                .spawn(move || movement_loop(&registry, &queue, &running, interval, map_size))?
        };

        let combat = {
            let registry = self.registry.clone();
            let queue = self.queue.clone();
            let flag = running.clone();
            let wait = self.config.fight_wait;
            let sides = self.config.dice_sides;
            let spawned = thread::Builder::new()
                .name("combat".into())
                .spawn(move || combat_loop(&registry, &queue, &flag, wait, sides));
            match spawned {
                Ok(handle) => handle,
                Err(err) => {
                    running.store(false, Ordering::Release);
                    let _ = movement.join();
                    return Err(err.into());
                }
            }
        };

        tracing::info!("Simulation started");
        Ok(SimulationHandle {
            running,
            queue: self.queue.clone(),
            movement: Some(movement),
            combat: Some(combat),
        })
    }

    /// Run for `config.run_duration`, rendering the map to `out` every
    /// `config.render_interval`, then stop and write the final census
    ///
    /// `out` is held for the whole run. Pass `io::stdout()` rather than a
    /// `StdoutLock`: a held lock blocks `ConsoleObserver` on the combat
    /// thread and the final join never returns.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<RunReport> {
        let handle = self.start()?;
        let started = Instant::now();

        let render_result = self.render_until_deadline(out, started);
        let shutdown = handle.stop();
        render_result?;

        let survivors: Vec<EntityView> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|v| v.alive)
            .collect();
        out.write_all(render_census(&survivors).as_bytes())?;
        out.flush()?;

        tracing::info!(
            ticks = shutdown.movement_ticks,
            fights = shutdown.combat.resolved,
            kills = shutdown.combat.kills,
            survivors = survivors.len(),
            "Simulation finished"
        );

        Ok(RunReport {
            shutdown,
            survivors,
        })
    }

    fn render_until_deadline<W: Write>(&self, out: &mut W, started: Instant) -> Result<()> {
        loop {
            let elapsed = started.elapsed();
            if elapsed >= self.config.run_duration {
                return Ok(());
            }

            let map = render_map(
                &self.registry.snapshot(),
                self.config.map_size,
                self.config.render_cell,
            );
            out.write_all(map.as_bytes())?;
            out.flush()?;

            let remaining = self.config.run_duration - elapsed;
            thread::sleep(self.config.render_interval.min(remaining));
        }
    }
}

/// Running worker threads
///
/// Dropping the handle stops the simulation as well.
pub struct SimulationHandle {
    running: Arc<AtomicBool>,
    queue: Arc<FightQueue>,
    movement: Option<JoinHandle<u64>>,
    combat: Option<JoinHandle<CombatStats>>,
}

impl SimulationHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Signal both loops and block until they have exited
    pub fn stop(mut self) -> ShutdownReport {
        self.shutdown()
    }

    fn shutdown(&mut self) -> ShutdownReport {
        self.running.store(false, Ordering::Release);
        self.queue.wake_all();

        let mut report = ShutdownReport::default();
        if let Some(movement) = self.movement.take() {
            match movement.join() {
                Ok(ticks) => report.movement_ticks = ticks,
                Err(_) => tracing::error!("Movement thread panicked"),
            }
        }
        if let Some(combat) = self.combat.take() {
            match combat.join() {
                Ok(stats) => report.combat = stats,
                Err(_) => tracing::error!("Combat thread panicked"),
            }
        }

        report.abandoned = self.queue.drain().len();
        tracing::info!("Simulation stopped");
        report
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        if self.movement.is_some() || self.combat.is_some() {
            self.shutdown();
        }
    }
}
