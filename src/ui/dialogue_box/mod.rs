// src/ui/dialogue_box/mod.rs
//
// Dialogue box module: the conversation panel at the bottom of the screen
// and the idle interaction prompt above it.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::UiPlugin;
