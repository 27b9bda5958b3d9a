//! Live fight resolution
//!
//! A queued fight is only a request. Either side may have died since it was
//! queued, in which case the fight is discarded without telling anyone.
//! Otherwise the attacker wins iff its kind dominates the defender's kind
//! AND the attack die beats the defense die. Exactly one notification is
//! sent per resolved fight.

use rand::Rng;

use crate::combat::dominance::dominates;
use crate::entity::npc::Entity;

/// What happened to one fight request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FightOutcome {
    /// A participant was already dead; nothing was reported
    Discarded,
    /// The fight ran and was reported once
    Resolved {
        win: bool,
        attack_roll: u32,
        defense_roll: u32,
    },
}

impl FightOutcome {
    pub fn is_kill(&self) -> bool {
        matches!(self, FightOutcome::Resolved { win: true, .. })
    }
}

/// Roll one die with faces `1..=sides`
pub fn roll_die<R: Rng + ?Sized>(rng: &mut R, sides: u32) -> u32 {
    rng.gen_range(1..=sides.max(1))
}

/// Resolve a fight with both dice rolled from `rng`
pub fn resolve_fight<R: Rng + ?Sized>(
    attacker: &Entity,
    defender: &Entity,
    rng: &mut R,
    dice_sides: u32,
) -> FightOutcome {
    let attack_roll = roll_die(rng, dice_sides);
    let defense_roll = roll_die(rng, dice_sides);
    resolve_with_rolls(attacker, defender, attack_roll, defense_roll)
}

/// Resolve a fight with the dice already rolled
pub fn resolve_with_rolls(
    attacker: &Entity,
    defender: &Entity,
    attack_roll: u32,
    defense_roll: u32,
) -> FightOutcome {
    if !attacker.is_alive() || !defender.is_alive() {
        return FightOutcome::Discarded;
    }

    let can_kill = dominates(attacker.kind(), defender.kind());
    let win = can_kill && attack_roll > defense_roll;

    // make_dead only fails if someone else killed the defender after the
    // liveness check above; that fight belongs to them.
    if win && !defender.make_dead() {
        return FightOutcome::Discarded;
    }

    attacker.notify_fight(defender, win);
    FightOutcome::Resolved {
        win,
        attack_roll,
        defense_roll,
    }
}
