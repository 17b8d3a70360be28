//! WorldPlugin coordinates the backdrop and the camera that tracks the player.
use bevy::prelude::*;

use crate::{
    player::systems::tick_simulation,
    world::systems::{follow_player_camera, spawn_world_environment},
};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_world_environment)
            .add_systems(Update, follow_player_camera.after(tick_simulation));
    }
}
