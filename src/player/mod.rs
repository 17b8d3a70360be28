//! Player module exposing the proximity tracker and movement systems.
pub mod plugin;
pub mod proximity;
pub mod systems;

pub use plugin::PlayerPlugin;
