//! Components used by the world module.
use bevy::prelude::*;

/// Marker component for the 2D camera that follows the player.
#[derive(Component, Debug)]
pub struct MainCamera {
    /// Larger values close the gap to the player faster.
    pub follow_sharpness: f32,
}

impl Default for MainCamera {
    fn default() -> Self {
        Self {
            follow_sharpness: 6.0,
        }
    }
}

/// Marker component for the town backdrop.
#[derive(Component, Default)]
pub struct Ground;
