//! World module housing the town backdrop and the follow camera.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::WorldPlugin;
