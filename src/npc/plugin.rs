//! NPC plugin wiring actor sprites to the simulation context.
use bevy::prelude::*;

use crate::{
    npc::systems::{spawn_actor_sprites, sync_actor_sprites},
    player::systems::tick_simulation,
};

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_actor_sprites)
            .add_systems(Update, sync_actor_sprites.after(tick_simulation));
    }
}
