//! NPC module exposing actors, the registry, the roster loader, and sprite systems.
pub mod components;
pub mod plugin;
pub mod registry;
pub mod roster;
pub mod systems;

pub use plugin::NpcPlugin;
