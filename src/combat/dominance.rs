//! Dominance matrix
//!
//! Squirrel beats Werewolf, Werewolf beats Druid. Nothing else wins: not the
//! reverse pairings, not same-kind fights, and a Druid never wins at all.
//! The relation is cyclic in shape but deliberately incomplete, so some
//! pairs ignore each other in both directions.

use crate::core::types::Kind;

/// Does `attacker` structurally defeat `defender`?
pub fn dominates(attacker: Kind, defender: Kind) -> bool {
    matches!(
        (attacker, defender),
        (Kind::Squirrel, Kind::Werewolf) | (Kind::Werewolf, Kind::Druid)
    )
}
