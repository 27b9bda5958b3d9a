//! NPC factory
//!
//! Hands out unique ids and subscribes every entity it builds to the same
//! set of fight observers.

use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;

use crate::combat::observer::FightObservers;
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{EntityId, Kind};
use crate::entity::names::generate_name;
use crate::entity::npc::Entity;

pub struct NpcFactory {
    next_id: AtomicU32,
    observers: FightObservers,
}

impl NpcFactory {
    pub fn new(observers: FightObservers) -> Self {
        Self {
            next_id: AtomicU32::new(1),
            observers,
        }
    }

    /// Factory whose entities report to nobody
    pub fn silent() -> Self {
        Self::new(FightObservers::new())
    }

    fn next_id(&self) -> EntityId {
        EntityId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn attach(&self, mut entity: Entity) -> Entity {
        for observer in self.observers.iter() {
            entity.subscribe(observer.clone());
        }
        entity
    }

    pub fn create(&self, kind: Kind, x: i32, y: i32, name: impl Into<String>) -> Result<Entity> {
        let entity = Entity::new(self.next_id(), kind, x, y, name)?;
        Ok(self.attach(entity))
    }

    /// Create from a raw kind code, as found in roster files
    pub fn create_from_code(
        &self,
        code: i64,
        x: i32,
        y: i32,
        name: impl Into<String>,
    ) -> Result<Entity> {
        let kind = Kind::from_code(code)?;
        self.create(kind, x, y, name)
    }

    /// Read one `kind-code x y name` record from a token stream
    ///
    /// An unknown kind still consumes its three field tokens so the next
    /// record stays aligned.
    pub fn from_tokens<'a, I>(&self, tokens: &mut I) -> Result<Entity>
    where
        I: Iterator<Item = &'a str>,
    {
        let token = tokens
            .next()
            .ok_or_else(|| SkirmishError::MalformedRoster("missing kind code".into()))?;
        let code: i64 = token
            .parse()
            .map_err(|_| SkirmishError::MalformedRoster(format!("bad kind code: {token:?}")))?;

        let kind = match Kind::from_code(code) {
            Ok(kind) => kind,
            Err(err) => {
                tokens.by_ref().take(3).for_each(drop);
                return Err(err);
            }
        };

        let entity = Entity::from_tokens(self.next_id(), kind, tokens)?;
        Ok(self.attach(entity))
    }

    /// Create `count` NPCs with random kind, position in `[0, coord_max]`
    /// and name
    ///
    /// Failed constructions are logged and skipped.
    pub fn spawn_random<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
        coord_max: i32,
    ) -> Vec<Entity> {
        let mut spawned = Vec::with_capacity(count);
        for _ in 0..count {
            let kind = Kind::ALL[rng.gen_range(0..Kind::ALL.len())];
            let x = rng.gen_range(0..=coord_max);
            let y = rng.gen_range(0..=coord_max);
            let name = generate_name(rng);

            match self.create(kind, x, y, name) {
                Ok(entity) => spawned.push(entity),
                Err(err) => tracing::warn!("Error creating NPC: {}", err),
            }
        }
        spawned
    }
}

impl Default for NpcFactory {
    fn default() -> Self {
        Self::silent()
    }
}
