pub mod factory;
pub mod names;
pub mod npc;

pub use factory::NpcFactory;
pub use names::generate_name;
pub use npc::{Entity, EntityView};
