//! ASCII rendering of simulation state
//!
//! This module is READ-ONLY - it only ever sees snapshots, never the
//! registry itself.

use std::fmt::Write;

use crate::entity::npc::{Entity, EntityView};

/// Draw living entities on a `(map_size / cell)²` grid
///
/// Each cell covers `cell × cell` map units. When several entities share a
/// cell the last one in the snapshot wins. The grid is preceded by an
/// `Alive: N` line.
pub fn render_map(snapshot: &[EntityView], map_size: i32, cell: i32) -> String {
    let cell = cell.max(1);
    let side = (map_size / cell).max(0) as usize;
    let mut grid = vec![vec!['.'; side]; side];
    let mut alive = 0;

    for view in snapshot.iter().filter(|v| v.alive) {
        alive += 1;
        let gx = view.x / cell;
        let gy = view.y / cell;
        if (0..side as i32).contains(&gx) && (0..side as i32).contains(&gy) {
            grid[gy as usize][gx as usize] = view.kind.glyph();
        }
    }

    let mut out = String::with_capacity((side + 1) * side + 16);
    let _ = writeln!(out, "\nAlive: {alive}");
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out
}

/// List every living entity with kind, name and position
pub fn render_census(snapshot: &[EntityView]) -> String {
    let mut out = String::from("\nSurvivors:\n");
    let mut count = 0;
    for view in snapshot.iter().filter(|v| v.alive) {
        let _ = writeln!(out, "{} {} ({}, {})", view.kind, view.name, view.x, view.y);
        count += 1;
    }
    let _ = writeln!(out, "Total: {count}");
    out
}

/// Batch-mode listing, one entity per line
pub fn render_roster<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> String {
    let mut out = String::new();
    for entity in entities {
        let _ = writeln!(out, "{entity}");
    }
    if out.is_empty() {
        out.push_str("No survivors left\n");
    }
    out
}
