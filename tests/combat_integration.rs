//! Combat integration tests
//!
//! End-to-end checks of the dominance rule through both resolution paths:
//! the dice-based live resolver and the dice-free batch sweep.

use std::sync::Arc;

use parking_lot::Mutex;

use skirmish::combat::{
    dominates, fight_band, resolve_with_rolls, run_bands, FightObserver, FightObservers,
    FightOutcome,
};
use skirmish::core::{EntityId, Kind};
use skirmish::ecs::EntityRegistry;
use skirmish::entity::{Entity, NpcFactory};

/// Records (attacker name, defender name, win) for every notification
#[derive(Default)]
struct MockObserver {
    fights: Mutex<Vec<(String, String, bool)>>,
}

impl MockObserver {
    fn last(&self) -> Option<(String, String, bool)> {
        self.fights.lock().last().cloned()
    }

    fn count(&self) -> usize {
        self.fights.lock().len()
    }
}

impl FightObserver for MockObserver {
    fn on_fight(&self, attacker: &Entity, defender: &Entity, win: bool) {
        self.fights
            .lock()
            .push((attacker.name().to_string(), defender.name().to_string(), win));
    }
}

fn watched_factory() -> (NpcFactory, Arc<MockObserver>) {
    let observer = Arc::new(MockObserver::default());
    let observers = FightObservers::from(vec![observer.clone() as Arc<dyn FightObserver>]);
    (NpcFactory::new(observers), observer)
}

#[test]
fn test_dominance_table_is_fixed() {
    for _ in 0..3 {
        assert!(dominates(Kind::Squirrel, Kind::Werewolf));
        assert!(dominates(Kind::Werewolf, Kind::Druid));
        for kind in Kind::ALL {
            assert!(!dominates(kind, kind));
            assert!(!dominates(Kind::Druid, kind));
        }
        assert!(!dominates(Kind::Werewolf, Kind::Squirrel));
        assert!(!dominates(Kind::Druid, Kind::Werewolf));
        assert!(!dominates(Kind::Squirrel, Kind::Druid));
    }
}

#[test]
fn test_distance_example() {
    let factory = NpcFactory::silent();
    let squirrel = factory.create(Kind::Squirrel, 100, 100, "Squirrel1").unwrap();
    let werewolf = factory.create(Kind::Werewolf, 103, 104, "Werewolf1").unwrap();

    assert!(squirrel.is_close(&werewolf, 5));
    assert!(!squirrel.is_close(&werewolf, 4));
}

#[test]
fn test_squirrel_fight_logic() {
    let (factory, observer) = watched_factory();
    let squirrel = factory.create(Kind::Squirrel, 100, 100, "Squirrel1").unwrap();
    let werewolf = factory.create(Kind::Werewolf, 100, 100, "Werewolf1").unwrap();
    let druid = factory.create(Kind::Druid, 100, 100, "Druid1").unwrap();

    assert!(resolve_with_rolls(&squirrel, &werewolf, 4, 1).is_kill());
    assert_eq!(
        observer.last(),
        Some(("Squirrel1".into(), "Werewolf1".into(), true))
    );

    let outcome = resolve_with_rolls(&squirrel, &druid, 6, 1);
    assert!(!outcome.is_kill());
    assert_eq!(observer.last(), Some(("Squirrel1".into(), "Druid1".into(), false)));
    assert!(druid.is_alive());
}

#[test]
fn test_werewolf_fight_logic() {
    let (factory, observer) = watched_factory();
    let werewolf = factory.create(Kind::Werewolf, 100, 100, "Werewolf1").unwrap();
    let druid = factory.create(Kind::Druid, 100, 100, "Druid1").unwrap();
    let squirrel = factory.create(Kind::Squirrel, 100, 100, "Squirrel1").unwrap();

    assert!(resolve_with_rolls(&werewolf, &druid, 2, 1).is_kill());
    assert!(!druid.is_alive());

    assert!(!resolve_with_rolls(&werewolf, &squirrel, 6, 1).is_kill());
    assert!(squirrel.is_alive());
    assert_eq!(observer.count(), 2);
    assert_eq!(observer.last().unwrap().2, false);
}

#[test]
fn test_druid_loses_against_everyone() {
    let (factory, observer) = watched_factory();
    let druid = factory.create(Kind::Druid, 100, 100, "Druid1").unwrap();
    let squirrel = factory.create(Kind::Squirrel, 100, 100, "Squirrel1").unwrap();
    let werewolf = factory.create(Kind::Werewolf, 100, 100, "Werewolf1").unwrap();

    resolve_with_rolls(&druid, &squirrel, 6, 1);
    assert_eq!(observer.last(), Some(("Druid1".into(), "Squirrel1".into(), false)));

    resolve_with_rolls(&druid, &werewolf, 6, 1);
    assert_eq!(observer.last(), Some(("Druid1".into(), "Werewolf1".into(), false)));

    assert!(squirrel.is_alive());
    assert!(werewolf.is_alive());
    assert_eq!(observer.count(), 2);
}

#[test]
fn test_discarded_fights_are_silent() {
    let (factory, observer) = watched_factory();
    let squirrel = factory.create(Kind::Squirrel, 100, 100, "Squirrel1").unwrap();
    let werewolf = factory.create(Kind::Werewolf, 100, 100, "Werewolf1").unwrap();
    werewolf.make_dead();

    for _ in 0..5 {
        assert_eq!(resolve_with_rolls(&squirrel, &werewolf, 6, 1), FightOutcome::Discarded);
        assert_eq!(resolve_with_rolls(&werewolf, &squirrel, 6, 1), FightOutcome::Discarded);
    }
    assert_eq!(observer.count(), 0);
}

#[test]
fn test_batch_squirrel_beats_werewolf() {
    let (factory, _observer) = watched_factory();
    let registry = EntityRegistry::new();
    let squirrel = registry
        .insert(factory.create(Kind::Squirrel, 100, 100, "E1").unwrap())
        .unwrap();
    let werewolf = registry
        .insert(factory.create(Kind::Werewolf, 103, 104, "E2").unwrap())
        .unwrap();

    let report = run_bands(&registry, &[20]);

    assert_eq!(report.bands[0].casualties.len(), 1);
    assert_eq!(report.bands[0].casualties[0].id, werewolf);
    assert_eq!(report.survivors.len(), 1);
    assert_eq!(report.survivors[0].id, squirrel);
    assert!(report.survivors[0].alive);
}

#[test]
fn test_batch_band_reports_every_checked_pair() {
    let (factory, observer) = watched_factory();
    let entities: Vec<Arc<Entity>> = vec![
        Arc::new(factory.create(Kind::Druid, 10, 10, "D").unwrap()),
        Arc::new(factory.create(Kind::Squirrel, 12, 10, "S").unwrap()),
    ];

    let dead = fight_band(&entities, 20);

    assert!(dead.is_empty());
    // D→S and S→D, both standoffs
    assert_eq!(observer.count(), 2);
    assert!(observer.fights.lock().iter().all(|(_, _, win)| !win));
}

#[test]
fn test_batch_cycle_within_one_band() {
    // All three kinds in range of each other: the werewolf is slated by the
    // squirrel but, still standing until the band ends, takes the druid too.
    let registry = EntityRegistry::new();
    registry
        .insert(Entity::new(EntityId(1), Kind::Squirrel, 50, 50, "S").unwrap())
        .unwrap();
    registry
        .insert(Entity::new(EntityId(2), Kind::Werewolf, 55, 50, "W").unwrap())
        .unwrap();
    registry
        .insert(Entity::new(EntityId(3), Kind::Druid, 60, 50, "D").unwrap())
        .unwrap();

    let report = run_bands(&registry, &[20, 40]);

    let killed: Vec<EntityId> = report.bands[0].casualties.iter().map(|v| v.id).collect();
    assert_eq!(killed, vec![EntityId(2), EntityId(3)]);
    assert_eq!(report.survivors.len(), 1);
    assert_eq!(report.survivors[0].kind, Kind::Squirrel);
}
