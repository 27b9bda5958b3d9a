pub mod registry;

pub use registry::EntityRegistry;
