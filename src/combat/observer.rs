//! Fight observers
//!
//! Every resolved fight is reported to the attacker's observers, synchronously
//! and in registration order, on the thread that resolved it. Observers must
//! return promptly: a blocking observer stalls the combat loop.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::error::Result;
use crate::entity::npc::Entity;

/// Receives the outcome of every fight an entity starts
pub trait FightObserver: Send + Sync {
    fn on_fight(&self, attacker: &Entity, defender: &Entity, win: bool);
}

/// Ordered list of observers
#[derive(Clone, Default)]
pub struct FightObservers {
    observers: Vec<Arc<dyn FightObserver>>,
}

impl FightObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: Arc<dyn FightObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn FightObserver>> {
        self.observers.iter()
    }

    /// Deliver one outcome to every observer
    pub fn notify(&self, attacker: &Entity, defender: &Entity, win: bool) {
        for observer in &self.observers {
            observer.on_fight(attacker, defender, win);
        }
    }
}

impl From<Vec<Arc<dyn FightObserver>>> for FightObservers {
    fn from(observers: Vec<Arc<dyn FightObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for FightObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FightObservers")
            .field("count", &self.observers.len())
            .finish()
    }
}

/// Prints a "Murder" block to stdout for every kill
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl ConsoleObserver {
    pub fn new() -> Self {
        Self
    }

    /// The block printed for one kill
    pub fn report(attacker: &Entity, defender: &Entity) -> String {
        format!("\nMurder --------\nKiller: {attacker}\nVictim: {defender}\n")
    }
}

impl FightObserver for ConsoleObserver {
    fn on_fight(&self, attacker: &Entity, defender: &Entity, win: bool) {
        if !win {
            return;
        }
        let mut stdout = io::stdout().lock();
        if let Err(err) = stdout.write_all(Self::report(attacker, defender).as_bytes()) {
            tracing::warn!("Failed to print fight: {}", err);
        }
    }
}

/// Appends a record of every kill to a log file
pub struct FileObserver<W: Write + Send = File> {
    writer: Mutex<W>,
}

impl FileObserver<File> {
    /// Open `path` for appending, creating it if needed
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::with_writer(file))
    }
}

impl<W: Write + Send> FileObserver<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_record(&self, attacker: &Entity, defender: &Entity) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writeln!(writer)?;
        writeln!(writer, "Murder ---")?;
        writeln!(writer, "Killer: {}", describe(attacker))?;
        writeln!(writer, "Victim: {}", describe(defender))?;
        writer.flush()
    }
}

fn describe(entity: &Entity) -> String {
    format!(
        "{} \"{}\" {{x:{}, y:{}}}",
        entity.kind(),
        entity.name(),
        entity.x(),
        entity.y()
    )
}

impl<W: Write + Send> FightObserver for FileObserver<W> {
    fn on_fight(&self, attacker: &Entity, defender: &Entity, win: bool) {
        if !win {
            return;
        }
        if let Err(err) = self.write_record(attacker, defender) {
            tracing::warn!("Failed to append fight log: {}", err);
        }
    }
}

/// Emits every fight, won or not, as a debug event
#[derive(Debug, Default)]
pub struct TracingObserver;

impl FightObserver for TracingObserver {
    fn on_fight(&self, attacker: &Entity, defender: &Entity, win: bool) {
        tracing::debug!(
            attacker = attacker.name(),
            attacker_kind = %attacker.kind(),
            defender = defender.name(),
            defender_kind = %defender.kind(),
            win,
            "fight resolved"
        );
    }
}

/// Counts outcomes for the end-of-run summary
#[derive(Debug, Default)]
pub struct TallyObserver {
    kills: AtomicU64,
    standoffs: AtomicU64,
}

impl TallyObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kills(&self) -> u64 {
        self.kills.load(Ordering::Relaxed)
    }

    pub fn standoffs(&self) -> u64 {
        self.standoffs.load(Ordering::Relaxed)
    }

    pub fn fights(&self) -> u64 {
        self.kills() + self.standoffs()
    }
}

impl FightObserver for TallyObserver {
    fn on_fight(&self, _attacker: &Entity, _defender: &Entity, win: bool) {
        if win {
            self.kills.fetch_add(1, Ordering::Relaxed);
        } else {
            self.standoffs.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{EntityId, Kind};

    struct Recorder {
        tag: &'static str,
        log: Arc<Mutex<Vec<(&'static str, bool)>>>,
    }

    impl FightObserver for Recorder {
        fn on_fight(&self, _attacker: &Entity, _defender: &Entity, win: bool) {
            self.log.lock().push((self.tag, win));
        }
    }

    fn pair() -> (Entity, Entity) {
        (
            Entity::new(EntityId(1), Kind::Squirrel, 10, 20, "Swift_1").unwrap(),
            Entity::new(EntityId(2), Kind::Werewolf, 30, 40, "Night_2").unwrap(),
        )
    }

    #[test]
    fn test_notify_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut observers = FightObservers::new();
        observers.push(Arc::new(Recorder { tag: "first", log: log.clone() }));
        observers.push(Arc::new(Recorder { tag: "second", log: log.clone() }));

        let (a, b) = pair();
        observers.notify(&a, &b, true);
        observers.notify(&a, &b, false);

        assert_eq!(
            *log.lock(),
            vec![("first", true), ("second", true), ("first", false), ("second", false)]
        );
    }

    #[test]
    fn test_file_observer_records_kills_only() {
        let observer = FileObserver::with_writer(Vec::new());
        let (a, b) = pair();
        observer.on_fight(&a, &b, false);
        observer.on_fight(&a, &b, true);

        let text = String::from_utf8(observer.into_inner()).unwrap();
        assert_eq!(
            text,
            "\nMurder ---\nKiller: Squirrel \"Swift_1\" {x:10, y:20}\nVictim: Werewolf \"Night_2\" {x:30, y:40}\n"
        );
    }

    #[test]
    fn test_console_report() {
        let (a, b) = pair();
        let report = ConsoleObserver::report(&a, &b);
        assert!(report.contains("Murder"));
        assert!(report.contains("Killer: Squirrel: {name: \"Swift_1\", x:10, y:20}"));
        assert!(report.contains("Victim: Werewolf"));
    }

    #[test]
    fn test_tally() {
        let tally = TallyObserver::new();
        let (a, b) = pair();
        tally.on_fight(&a, &b, true);
        tally.on_fight(&a, &b, false);
        tally.on_fight(&a, &b, false);
        assert_eq!(tally.kills(), 1);
        assert_eq!(tally.standoffs(), 2);
        assert_eq!(tally.fights(), 3);
    }
}
