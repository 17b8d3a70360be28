//! Core module owning the simulation clock and the shared simulation context.
pub mod context;
pub mod plugin;

pub use plugin::CorePlugin;
