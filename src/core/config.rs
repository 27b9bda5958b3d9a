//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other.

use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{Result, SkirmishError};
use crate::core::types::COORD_MAX;

/// Configuration for the live simulation and the batch sweep
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    // === LIVE MAP ===
    /// Side length of the square live map
    ///
    /// Movement clamps positions into `[0, map_size - 1]`. This is smaller
    /// than the range accepted at construction time (`COORD_MAX`).
    pub map_size: i32,

    /// Number of NPCs created when the live simulation starts
    pub population: usize,

    /// Total wall-clock budget of a live run
    pub run_duration: Duration,

    // === WORKER LOOPS ===
    /// Pause between two movement/proximity ticks
    pub move_interval: Duration,

    /// Longest time the combat loop blocks waiting for a fight
    ///
    /// Also bounds how long shutdown can lag behind the running flag.
    pub fight_wait: Duration,

    /// Pause between two map renders on the driver thread
    pub render_interval: Duration,

    /// Side length of one ASCII map cell in map units
    pub render_cell: i32,

    // === COMBAT ===
    /// Number of faces on the attack and defense dice
    pub dice_sides: u32,

    // === BATCH MODE ===
    /// Number of NPCs created by the batch sweep
    pub batch_population: usize,

    /// First, step and last distance band of the batch sweep
    pub batch_band_start: u32,
    pub batch_band_step: u32,
    pub batch_band_end: u32,

    // === FILES ===
    /// Where the file observer appends kill records
    pub fight_log_path: PathBuf,

    /// Where the batch sweep saves and reloads its roster
    pub roster_path: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            map_size: 100,
            population: 50,
            run_duration: Duration::from_secs(30),

            move_interval: Duration::from_millis(50),
            fight_wait: Duration::from_millis(100),
            render_interval: Duration::from_secs(1),
            render_cell: 10,

            dice_sides: 6,

            batch_population: 10,
            batch_band_start: 20,
            batch_band_step: 20,
            batch_band_end: 100,

            fight_log_path: PathBuf::from("log.txt"),
            roster_path: PathBuf::from("npcs.txt"),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance bands swept by the batch mode, ascending
    pub fn batch_bands(&self) -> Vec<u32> {
        if self.batch_band_step == 0 {
            return vec![self.batch_band_start];
        }
        (self.batch_band_start..=self.batch_band_end)
            .step_by(self.batch_band_step as usize)
            .collect()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.map_size <= 0 || self.map_size > COORD_MAX + 1 {
            return Err(SkirmishError::InvalidConfig(format!(
                "map_size ({}) must be in 1..={}",
                self.map_size,
                COORD_MAX + 1
            )));
        }

        if self.render_cell <= 0 || self.render_cell > self.map_size {
            return Err(SkirmishError::InvalidConfig(format!(
                "render_cell ({}) must be in 1..=map_size ({})",
                self.render_cell, self.map_size
            )));
        }

        if self.dice_sides < 2 {
            return Err(SkirmishError::InvalidConfig(
                "dice need at least two sides".into(),
            ));
        }

        if self.move_interval.is_zero() || self.fight_wait.is_zero() {
            return Err(SkirmishError::InvalidConfig(
                "worker intervals must be positive".into(),
            ));
        }

        if self.batch_band_step == 0 || self.batch_band_start > self.batch_band_end {
            return Err(SkirmishError::InvalidConfig(format!(
                "batch bands {}..={} step {} are empty",
                self.batch_band_start, self.batch_band_end, self.batch_band_step
            )));
        }

        Ok(())
    }
}
