pub mod batch;
pub mod dominance;
pub mod observer;
pub mod resolution;

pub use batch::{fight_band, run_bands, BandReport, BatchReport};
pub use dominance::dominates;
pub use observer::{
    ConsoleObserver, FightObserver, FightObservers, FileObserver, TallyObserver, TracingObserver,
};
pub use resolution::{resolve_fight, resolve_with_rolls, roll_die, FightOutcome};
