//! Skirmish - concurrent NPC battle simulation
//!
//! Squirrels, werewolves and druids wander a small map and fight under a
//! cyclic dominance rule. A movement thread detects proximity and queues
//! fights; a combat thread resolves them with dice.

pub mod combat;
pub mod core;
pub mod ecs;
pub mod entity;
pub mod persistence;
pub mod render;
pub mod simulation;
