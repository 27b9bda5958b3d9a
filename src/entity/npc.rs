//! The NPC record shared between the worker loops
//!
//! Kind, id and name are fixed at construction. Position and liveness are
//! atomics so the movement loop and the combat loop can mutate different
//! entities (or different fields of the same entity) while both hold only a
//! shared registry lock. Position axes are stored separately, so a reader may
//! briefly see `x` from one step and `y` from the next; gameplay tolerates it.

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::combat::observer::{FightObserver, FightObservers};
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{EntityId, Kind, Position};

/// A live NPC
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    kind: Kind,
    name: String,
    x: AtomicI32,
    y: AtomicI32,
    alive: AtomicBool,
    observers: FightObservers,
}

impl Entity {
    /// Build an entity, rejecting coordinates outside `[0, 500]`
    pub fn new(id: EntityId, kind: Kind, x: i32, y: i32, name: impl Into<String>) -> Result<Self> {
        let position = Position::new(x, y);
        if !position.in_bounds() {
            return Err(SkirmishError::InvalidCoordinate {
                x: x.into(),
                y: y.into(),
            });
        }

        Ok(Self {
            id,
            kind,
            name: name.into(),
            x: AtomicI32::new(x),
            y: AtomicI32::new(y),
            alive: AtomicBool::new(true),
            observers: FightObservers::new(),
        })
    }

    /// Build an entity from the `x`, `y`, `name` tokens that follow a kind
    /// code in a roster stream
    ///
    /// Applies the same coordinate check as [`Entity::new`].
    pub fn from_tokens<'a, I>(id: EntityId, kind: Kind, tokens: &mut I) -> Result<Self>
    where
        I: Iterator<Item = &'a str>,
    {
        let x = next_int(tokens, "x")?;
        let y = next_int(tokens, "y")?;
        let name = tokens
            .next()
            .ok_or_else(|| SkirmishError::MalformedRoster("missing name".into()))?;

        // Anything past i32 is just another out-of-range coordinate
        match (i32::try_from(x), i32::try_from(y)) {
            (Ok(x), Ok(y)) => Self::new(id, kind, x, y, name),
            _ => Err(SkirmishError::InvalidCoordinate { x, y }),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> i32 {
        self.x.load(Ordering::Relaxed)
    }

    pub fn y(&self) -> i32 {
        self.y.load(Ordering::Relaxed)
    }

    pub fn position(&self) -> Position {
        Position::new(self.x(), self.y())
    }

    /// Move without validation; the caller clamps to the map
    pub fn set_position(&self, x: i32, y: i32) {
        self.x.store(x, Ordering::Relaxed);
        self.y.store(y, Ordering::Relaxed);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Kill the entity
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn make_dead(&self) -> bool {
        self.alive.swap(false, Ordering::AcqRel)
    }

    pub fn move_reach(&self) -> i32 {
        self.kind.move_reach()
    }

    pub fn kill_reach(&self) -> i32 {
        self.kind.kill_reach()
    }

    /// Whether `other` lies within `distance` (inclusive)
    pub fn is_close(&self, other: &Entity, distance: u32) -> bool {
        self.position().within(&other.position(), distance)
    }

    pub fn subscribe(&mut self, observer: Arc<dyn FightObserver>) {
        self.observers.push(observer);
    }

    pub fn observers(&self) -> &FightObservers {
        &self.observers
    }

    /// Report a fight in which this entity was the attacker
    pub fn notify_fight(&self, defender: &Entity, win: bool) {
        self.observers.notify(self, defender, win);
    }

    /// Point-in-time copy for rendering and reports
    pub fn view(&self) -> EntityView {
        EntityView {
            id: self.id,
            kind: self.kind,
            name: self.name.clone(),
            x: self.x(),
            y: self.y(),
            alive: self.is_alive(),
        }
    }

    /// Write the four roster fields, one per line
    pub fn write_fields<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", self.kind.code())?;
        writeln!(writer, "{}", self.x())?;
        writeln!(writer, "{}", self.y())?;
        writeln!(writer, "{}", self.name)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {{name: \"{}\", x:{}, y:{}}}",
            self.kind,
            self.name,
            self.x(),
            self.y()
        )
    }
}

fn next_int<'a, I>(tokens: &mut I, field: &str) -> Result<i64>
where
    I: Iterator<Item = &'a str>,
{
    let token = tokens
        .next()
        .ok_or_else(|| SkirmishError::MalformedRoster(format!("missing {field}")))?;
    token
        .parse()
        .map_err(|_| SkirmishError::MalformedRoster(format!("bad {field}: {token:?}")))
}

/// Immutable snapshot of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: Kind,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub alive: bool,
}

impl EntityView {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}
