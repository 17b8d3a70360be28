// src/ui/dialogue_box/plugin.rs
//
// UiPlugin wires the dialogue box and interaction prompt systems.

use bevy::prelude::*;

use crate::dialogue::systems::poll_conversation_replies;

use super::components::DialogueBoxSettings;
use super::systems::{spawn_dialogue_box, update_dialogue_box, update_interaction_prompt};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        info!("UiPlugin registered");

        app.insert_resource(DialogueBoxSettings::default())
            .add_systems(Startup, spawn_dialogue_box)
            .add_systems(
                Update,
                (update_dialogue_box, update_interaction_prompt).after(poll_conversation_replies),
            );
    }
}
