pub mod roster;

pub use roster::{load_roster, parse_roster, read_roster, save_roster, write_roster};
