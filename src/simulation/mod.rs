pub mod combat_loop;
pub mod driver;
pub mod movement;
pub mod queue;

pub use combat_loop::{combat_loop, process_task, CombatStats};
pub use driver::{RunReport, ShutdownReport, Simulation, SimulationHandle};
pub use movement::{movement_loop, run_tick, scan_targets, step, TickSummary};
pub use queue::{FightQueue, FightTask};
