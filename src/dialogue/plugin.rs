//! Dialogue plugin wiring the conversation client, session systems, and telemetry.
use bevy::prelude::*;

use crate::player::systems::tick_simulation;

use super::{
    client::{ActiveConversationClient, HttpConversationClient},
    events::DialogueSessionEvent,
    status::DialogueBackendStatus,
    systems::{
        check_backend_health, poll_conversation_replies, request_memory_reset,
        route_keyboard_input,
    },
    telemetry::{flush_dialogue_telemetry_log, record_dialogue_telemetry, DialogueTelemetryLog},
};

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ActiveConversationClient::new(Box::new(
            HttpConversationClient::new(),
        )))
        .init_resource::<DialogueBackendStatus>()
        .init_resource::<DialogueTelemetryLog>()
        .add_message::<DialogueSessionEvent>()
        .add_systems(Startup, (log_conversation_client, check_backend_health).chain())
        .add_systems(
            Update,
            (
                route_keyboard_input,
                poll_conversation_replies,
                request_memory_reset,
            )
                .chain()
                .after(tick_simulation),
        )
        .add_systems(
            Update,
            (record_dialogue_telemetry, flush_dialogue_telemetry_log)
                .chain()
                .after(request_memory_reset),
        );
    }
}

fn log_conversation_client(client: Res<ActiveConversationClient>) {
    info!(
        "DialoguePlugin initialised with client: {}",
        client.describe()
    );
}
