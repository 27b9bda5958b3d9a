//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SkirmishError};

/// Lowest coordinate accepted when constructing or loading an entity
pub const COORD_MIN: i32 = 0;
/// Highest coordinate accepted when constructing or loading an entity
///
/// The live map is much smaller (see `SimulationConfig::map_size`); movement
/// clamps to the map, construction only checks this wider range.
pub const COORD_MAX: i32 = 500;

/// Unique handle for an entity in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// The three NPC kinds
///
/// Squirrel beats Werewolf, Werewolf beats Druid, Druid beats nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Kind {
    Squirrel = 1,
    Werewolf = 2,
    Druid = 3,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Squirrel, Kind::Werewolf, Kind::Druid];

    /// Numeric code used in roster files
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Parse a roster code
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(Kind::Squirrel),
            2 => Ok(Kind::Werewolf),
            3 => Ok(Kind::Druid),
            other => Err(SkirmishError::UnknownKind(other)),
        }
    }

    /// How far one step moves this kind
    pub fn move_reach(self) -> i32 {
        match self {
            Kind::Druid => 10,
            Kind::Squirrel | Kind::Werewolf => 0,
        }
    }

    /// How close a target must be before this kind picks a fight
    pub fn kill_reach(self) -> i32 {
        match self {
            Kind::Druid => 10,
            Kind::Squirrel | Kind::Werewolf => 0,
        }
    }

    /// Single character used on the ASCII map
    pub fn glyph(self) -> char {
        match self {
            Kind::Squirrel => 'S',
            Kind::Werewolf => 'W',
            Kind::Druid => 'D',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Squirrel => "Squirrel",
            Kind::Werewolf => "Werewolf",
            Kind::Druid => "Druid",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Integer map position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance, widened so it cannot overflow
    pub fn distance_sq(&self, other: &Self) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// Inclusive range check without floating point
    pub fn within(&self, other: &Self, distance: u32) -> bool {
        let d = i64::from(distance);
        self.distance_sq(other) <= d * d
    }

    /// True when both axes are inside the construction range
    pub fn in_bounds(&self) -> bool {
        (COORD_MIN..=COORD_MAX).contains(&self.x) && (COORD_MIN..=COORD_MAX).contains(&self.y)
    }

    /// Clamp each axis into `[0, size - 1]`
    pub fn clamped(&self, size: i32) -> Self {
        let max = (size - 1).max(0);
        Self {
            x: self.x.clamp(0, max),
            y: self.y.clamp(0, max),
        }
    }
}
