//! Systems feeding keyboard input into the session and applying backend replies.
use bevy::{
    input::{keyboard::KeyboardInput, ButtonState},
    log::{debug, info, warn},
    prelude::*,
};

use crate::core::context::SimulationContext;

use super::{
    client::ActiveConversationClient,
    errors::CommunicationError,
    events::DialogueSessionEvent,
    input::{interpret, KeyStroke},
    session::{DialogueMode, SessionEffect},
    status::DialogueBackendStatus,
    types::BackendReply,
};

/// Translates pressed keys into session inputs and dispatches new chat calls.
pub fn route_keyboard_input(
    mut keys: MessageReader<KeyboardInput>,
    mut context: ResMut<SimulationContext>,
    client: Res<ActiveConversationClient>,
    mut session_events: MessageWriter<DialogueSessionEvent>,
) {
    for key in keys.read() {
        if key.state != ButtonState::Pressed {
            continue;
        }
        // A single press can carry several characters (dead keys, IME commits).
        for stroke in KeyStroke::from_logical_key(&key.logical_key) {
            let Some(input) = interpret(context.session().mode(), stroke) else {
                continue;
            };
            let Some(effect) = context.handle_input(input) else {
                continue;
            };

            match &effect {
                SessionEffect::Opened { target } => {
                    info!(target: "dialogue", "Conversation opened with {}", target);
                }
                SessionEffect::Dispatched(outgoing) => {
                    client.send(outgoing.token, outgoing.request.clone());
                }
                SessionEffect::Closed { target, abandoned } => {
                    info!(target: "dialogue", "Conversation with {} closed", target);
                    if let Some(token) = abandoned {
                        debug!(target: "dialogue", "Abandoned outstanding {}", token);
                    }
                }
                SessionEffect::Resolved { .. } | SessionEffect::Discarded { .. } => {}
            }

            session_events.write(DialogueSessionEvent { effect });
        }
    }
}

/// Drains completed backend calls and applies them to the session and status.
pub fn poll_conversation_replies(
    client: Res<ActiveConversationClient>,
    mut context: ResMut<SimulationContext>,
    mut status: ResMut<DialogueBackendStatus>,
    mut session_events: MessageWriter<DialogueSessionEvent>,
) {
    for reply in client.drain_replies() {
        match reply {
            BackendReply::Chat { token, result } => {
                record_reachability(&mut status, answered(&result));
                if let Err(err) = &result {
                    warn!(target: "dialogue", "Chat call {} failed: {}", token, err);
                }

                let effect = context.resolve_chat(token, result);
                if let SessionEffect::Discarded { token } = &effect {
                    debug!(target: "dialogue", "Discarded stale reply for {}", token);
                }
                session_events.write(DialogueSessionEvent { effect });
            }
            BackendReply::Health(Ok(health)) => {
                info!(target: "dialogue", "Philosopher API health: {}", health.status);
                status.record_version(health.version);
                record_reachability(&mut status, true);
            }
            BackendReply::Health(Err(err)) => {
                record_reachability(&mut status, !err.indicates_unreachable());
                warn!(target: "dialogue", "Philosopher API health check failed: {}", err);
            }
            BackendReply::MemoryReset(Ok(reset)) => {
                record_reachability(&mut status, true);
                info!(
                    target: "dialogue",
                    "Conversation memory reset ({}): {}",
                    reset.status,
                    reset.message
                );
            }
            BackendReply::MemoryReset(Err(err)) => {
                record_reachability(&mut status, !err.indicates_unreachable());
                warn!(target: "dialogue", "Conversation memory reset failed: {}", err);
            }
        }
    }
}

fn answered<T>(result: &Result<T, CommunicationError>) -> bool {
    result
        .as_ref()
        .err()
        .is_none_or(|err| !err.indicates_unreachable())
}

fn record_reachability(status: &mut DialogueBackendStatus, reachable: bool) {
    if status.record_outcome(reachable) {
        info!(
            target: "dialogue",
            "Philosopher API is now {} (version {})",
            status.connection_state().label(),
            status.version().unwrap_or("unknown")
        );
    }
}

/// F5 asks the backend to forget every conversation. Ignored mid-session.
pub fn request_memory_reset(
    keyboard: Res<ButtonInput<KeyCode>>,
    context: Res<SimulationContext>,
    client: Res<ActiveConversationClient>,
) {
    if !keyboard.just_pressed(KeyCode::F5) {
        return;
    }
    if context.session().mode() != DialogueMode::Idle {
        debug!(target: "dialogue", "Memory reset ignored while a conversation is open");
        return;
    }
    info!(target: "dialogue", "Requesting conversation memory reset");
    client.reset_memory();
}

pub fn check_backend_health(client: Res<ActiveConversationClient>) {
    client.check_health();
}
