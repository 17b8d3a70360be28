//! Messages broadcast by the dialogue systems.
use bevy::prelude::Message;

use super::session::SessionEffect;

/// Fired for every session transition with an observable effect.
#[derive(Message, Debug, Clone)]
pub struct DialogueSessionEvent {
    pub effect: SessionEffect,
}
