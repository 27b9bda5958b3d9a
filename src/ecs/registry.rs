//! Entity registry - the shared set of all NPCs
//!
//! Membership is guarded by a reader/writer lock: inserting takes it
//! exclusively, scans and snapshots share it. The registry never locks
//! individual entities; their mutable fields are atomics and callers
//! mutate them through the `Arc<Entity>` handles they read out.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::core::error::{Result, SkirmishError};
use crate::core::types::EntityId;
use crate::entity::npc::{Entity, EntityView};

#[derive(Default)]
struct Members {
    entities: Vec<Arc<Entity>>,
    index: AHashMap<EntityId, usize>,
}

impl Members {
    fn reindex(&mut self) {
        self.index = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id(), i))
            .collect();
    }
}

/// All NPCs of one simulation
#[derive(Default)]
pub struct EntityRegistry {
    members: RwLock<Members>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity; ids must be unique
    pub fn insert(&self, entity: Entity) -> Result<EntityId> {
        let id = entity.id();
        let mut members = self.members.write();
        if members.index.contains_key(&id) {
            return Err(SkirmishError::DuplicateEntity(id));
        }
        let slot = members.entities.len();
        members.entities.push(Arc::new(entity));
        members.index.insert(id, slot);
        Ok(id)
    }

    /// Insert many entities under one exclusive lock, skipping duplicates
    ///
    /// Returns how many were inserted.
    pub fn extend(&self, entities: impl IntoIterator<Item = Entity>) -> usize {
        let mut members = self.members.write();
        let mut inserted = 0;
        for entity in entities {
            let id = entity.id();
            if members.index.contains_key(&id) {
                tracing::warn!("Skipping duplicate entity {:?}", id);
                continue;
            }
            let slot = members.entities.len();
            members.entities.push(Arc::new(entity));
            members.index.insert(id, slot);
            inserted += 1;
        }
        inserted
    }

    pub fn get(&self, id: EntityId) -> Option<Arc<Entity>> {
        let members = self.members.read();
        members.index.get(&id).map(|&slot| members.entities[slot].clone())
    }

    pub fn len(&self) -> usize {
        self.members.read().entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().entities.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.members
            .read()
            .entities
            .iter()
            .filter(|e| e.is_alive())
            .count()
    }

    /// Handles to every member, in insertion order
    pub fn entities(&self) -> Vec<Arc<Entity>> {
        self.members.read().entities.clone()
    }

    /// Run `f` over the member list while holding the shared lock
    ///
    /// Insertion blocks until `f` returns, so keep it short.
    pub fn with_members<R>(&self, f: impl FnOnce(&[Arc<Entity>]) -> R) -> R {
        let members = self.members.read();
        f(&members.entities)
    }

    /// Apply `f` to every living entity under the shared lock
    pub fn for_each_alive(&self, mut f: impl FnMut(&Entity)) {
        let members = self.members.read();
        for entity in members.entities.iter().filter(|e| e.is_alive()) {
            f(entity);
        }
    }

    /// Point-in-time copy of every member, ordered by id
    pub fn snapshot(&self) -> Vec<EntityView> {
        let mut views: Vec<EntityView> = {
            let members = self.members.read();
            members.entities.iter().map(|e| e.view()).collect()
        };
        views.sort_by_key(|v| v.id);
        views
    }

    /// Drop dead members; only the batch sweep does this
    pub fn prune_dead(&self) -> usize {
        let mut members = self.members.write();
        let before = members.entities.len();
        members.entities.retain(|e| e.is_alive());
        let removed = before - members.entities.len();
        if removed > 0 {
            members.reindex();
        }
        removed
    }
}
