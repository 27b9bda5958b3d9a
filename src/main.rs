//! Skirmish - Entry Point
//!
//! `skirmish live` runs the concurrent simulation for a fixed wall-clock
//! budget, printing the map every second. `skirmish batch` is the offline
//! sweep: create a small population, round-trip it through a roster file,
//! then fight it out band by band without dice.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use skirmish::combat::{
    run_bands, ConsoleObserver, FightObserver, FightObservers, FileObserver, TallyObserver,
    TracingObserver,
};
use skirmish::core::{Result, SimulationConfig, COORD_MAX};
use skirmish::ecs::EntityRegistry;
use skirmish::entity::NpcFactory;
use skirmish::persistence::{load_roster, save_roster};
use skirmish::render::render_roster;
use skirmish::simulation::Simulation;

/// Squirrels, werewolves and druids fighting it out
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Concurrent NPC battle simulation")]
struct Args {
    /// Log every fight, not just lifecycle events
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Real-time simulation with movement and combat threads
    Live {
        /// Seconds to run before the final census
        #[arg(long)]
        duration: Option<u64>,

        /// Number of NPCs to create
        #[arg(long)]
        count: Option<usize>,

        /// File that kill records are appended to
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Offline sweep over ascending distance bands
    Batch {
        /// Number of NPCs to create
        #[arg(long)]
        count: Option<usize>,

        /// Roster file to save and reload
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Output format for the survivors
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if args.verbose { "skirmish=debug" } else { "skirmish=info" })
        .with_writer(io::stderr)
        .init();

    let mut config = SimulationConfig::default();

    match args.mode.unwrap_or(Mode::Live {
        duration: None,
        count: None,
        log: None,
    }) {
        Mode::Live {
            duration,
            count,
            log,
        } => {
            if let Some(secs) = duration {
                config.run_duration = Duration::from_secs(secs);
            }
            if let Some(count) = count {
                config.population = count;
            }
            if let Some(log) = log {
                config.fight_log_path = log;
            }
            run_live(config)
        }
        Mode::Batch {
            count,
            roster,
            format,
        } => {
            if let Some(count) = count {
                config.batch_population = count;
            }
            if let Some(roster) = roster {
                config.roster_path = roster;
            }
            run_batch(config, format)
        }
    }
}

/// Console, file and tracing sinks, in that order
fn standard_observers(config: &SimulationConfig) -> FightObservers {
    let mut observers = FightObservers::new();
    observers.push(Arc::new(ConsoleObserver::new()));
    match FileObserver::open(&config.fight_log_path) {
        Ok(file) => observers.push(Arc::new(file)),
        Err(err) => tracing::warn!(
            "Fight log {} unavailable: {}",
            config.fight_log_path.display(),
            err
        ),
    }
    observers.push(Arc::new(TracingObserver));
    observers
}

fn run_live(config: SimulationConfig) -> Result<()> {
    let tally = Arc::new(TallyObserver::new());
    let mut observers = standard_observers(&config);
    observers.push(tally.clone() as Arc<dyn FightObserver>);

    let factory = NpcFactory::new(observers);
    let mut rng = rand::thread_rng();
    let simulation = Simulation::populate(config, &factory, &mut rng)?;

    // Unlocked handle: the console sink prints kills from the combat thread
    let report = simulation.run(&mut io::stdout())?;

    tracing::info!(
        fights = tally.fights(),
        kills = tally.kills(),
        abandoned = report.shutdown.abandoned,
        "Live run complete"
    );
    Ok(())
}

fn run_batch(config: SimulationConfig, format: Format) -> Result<()> {
    let factory = NpcFactory::new(standard_observers(&config));
    let mut rng = rand::thread_rng();

    let created: Vec<Arc<_>> = factory
        .spawn_random(&mut rng, config.batch_population, COORD_MAX)
        .into_iter()
        .map(Arc::new)
        .collect();
    save_roster(&config.roster_path, &created)?;

    let registry = EntityRegistry::new();
    registry.extend(load_roster(&config.roster_path, &factory));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let entities = registry.entities();
    out.write_all(render_roster(entities.iter().map(|e| &**e)).as_bytes())?;

    let report = run_bands(&registry, &config.batch_bands());

    match format {
        Format::Text => {
            let survivors = registry.entities();
            out.write_all(render_roster(survivors.iter().map(|e| &**e)).as_bytes())?;
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
    }

    tracing::info!(
        casualties = report.casualty_count(),
        survivors = report.survivors.len(),
        "Batch sweep complete"
    );
    Ok(())
}
