//! Flat-text NPC rosters
//!
//! Format: an entity count, then for each entity its kind code, x, y and
//! name, one token per line. No checksum. Bad records are logged and
//! skipped; a missing file loads as an empty roster.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use crate::core::error::{Result, SkirmishError};
use crate::entity::factory::NpcFactory;
use crate::entity::npc::Entity;

/// Write a roster to any writer
pub fn write_roster<'a, W, I>(writer: &mut W, entities: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Entity>,
    I::IntoIter: ExactSizeIterator,
{
    let entities = entities.into_iter();
    writeln!(writer, "{}", entities.len())?;
    for entity in entities {
        entity.write_fields(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Save a roster to `path`, replacing any previous file
pub fn save_roster(path: &Path, entities: &[Arc<Entity>]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_roster(&mut writer, entities.iter().map(|e| &**e))?;
    tracing::info!("Saved {} NPCs to {}", entities.len(), path.display());
    Ok(())
}

/// Parse a roster from text
///
/// Records with an unknown kind or out-of-range coordinates are skipped.
/// A truncated or non-numeric stream ends the load early; everything read
/// up to that point is kept.
pub fn parse_roster(text: &str, factory: &NpcFactory) -> Vec<Entity> {
    let mut tokens = text.split_whitespace();

    let count: usize = match tokens.next().map(str::parse::<usize>) {
        Some(Ok(count)) => count,
        Some(Err(_)) => {
            tracing::warn!("Roster does not start with a count");
            return Vec::new();
        }
        None => return Vec::new(),
    };

    let mut loaded = Vec::with_capacity(count.min(1024));
    for index in 0..count {
        match factory.from_tokens(&mut tokens) {
            Ok(entity) => loaded.push(entity),
            Err(err @ SkirmishError::MalformedRoster(_)) => {
                tracing::warn!("Roster truncated at record {}: {}", index, err);
                break;
            }
            Err(err) => tracing::warn!("Error loading NPC {}: {}", index, err),
        }
    }
    loaded
}

/// Read a roster from any reader
pub fn read_roster<R: Read>(reader: &mut R, factory: &NpcFactory) -> Result<Vec<Entity>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(parse_roster(&text, factory))
}

/// Load a roster from `path`
///
/// A missing or unreadable file is logged and yields an empty roster.
pub fn load_roster(path: &Path, factory: &NpcFactory) -> Vec<Entity> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let loaded = parse_roster(&text, factory);
            tracing::info!("Loaded {} NPCs from {}", loaded.len(), path.display());
            loaded
        }
        Err(source) => {
            let err = SkirmishError::PersistenceUnavailable {
                path: path.to_path_buf(),
                source,
            };
            tracing::warn!("{}", err);
            Vec::new()
        }
    }
}
