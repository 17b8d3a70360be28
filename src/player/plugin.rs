//! Player plugin wiring movement and the per-tick simulation step.
use bevy::prelude::*;

use crate::{
    core::plugin::update_simulation_clock,
    player::systems::{move_player, tick_simulation},
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (move_player, tick_simulation)
                .chain()
                .after(update_simulation_clock),
        );
    }
}
