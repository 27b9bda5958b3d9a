//! Random NPC names

use rand::seq::SliceRandom;
use rand::Rng;

const ADJECTIVES: [&str; 12] = [
    "Swift", "Brave", "Smart", "Agile", "Red", "Forest", "Night", "Gray", "Strong", "Wise", "Old",
    "Quiet",
];

/// `<Adjective>_<0..1000>`, never containing whitespace
pub fn generate_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Nameless");
    format!("{}_{}", adjective, rng.gen_range(0..1000))
}
