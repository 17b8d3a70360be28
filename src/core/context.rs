//! Explicit simulation context owning actors, proximity, and the dialogue session.
use std::time::Duration;

use bevy::prelude::*;

use crate::{
    dialogue::{
        errors::CommunicationError,
        session::{DialogueInput, DialogueSession, SessionEffect},
        settings::{DialogueSettings, ProximitySettings},
        types::{ChatResponse, RequestToken},
    },
    npc::registry::ActorRegistry,
    player::proximity::ProximityState,
};

/// Everything a tick handler needs. The session is owned exclusively here;
/// the registry is written only by player movement and the NPC side effects
/// of session transitions.
#[derive(Resource, Debug)]
pub struct SimulationContext {
    registry: ActorRegistry,
    proximity: ProximityState,
    session: DialogueSession,
    proximity_settings: ProximitySettings,
}

/// Result of one simulation tick.
#[derive(Debug, Default)]
pub struct TickOutcome {
    pub proximity_changed: bool,
    pub effect: Option<SessionEffect>,
}

impl SimulationContext {
    pub fn new(registry: ActorRegistry, settings: &DialogueSettings) -> Self {
        Self {
            registry,
            proximity: ProximityState::default(),
            session: DialogueSession::new(settings.session.clone()),
            proximity_settings: settings.proximity.clone(),
        }
    }

    pub fn registry(&self) -> &ActorRegistry {
        &self.registry
    }

    pub fn proximity(&self) -> &ProximityState {
        &self.proximity
    }

    pub fn session(&self) -> &DialogueSession {
        &self.session
    }

    pub fn move_player(&mut self, direction: Vec2, delta: Duration) {
        self.registry.move_player(direction, delta.as_secs_f32());
    }

    /// Advances NPCs, recomputes proximity unconditionally, and runs the
    /// response timeout.
    pub fn tick(&mut self, delta: Duration) -> TickOutcome {
        self.registry.advance_npcs(delta.as_secs_f32());
        let proximity_changed = self
            .proximity
            .refresh(&self.registry, &self.proximity_settings);
        let effect = self.session.tick(delta);
        if let Some(effect) = &effect {
            self.apply_actor_effects(effect);
        }

        TickOutcome {
            proximity_changed,
            effect,
        }
    }

    pub fn handle_input(&mut self, input: DialogueInput) -> Option<SessionEffect> {
        let in_range = self.proximity.target().cloned();
        let effect = self.session.handle(input, in_range.as_ref())?;
        self.apply_actor_effects(&effect);
        Some(effect)
    }

    pub fn resolve_chat(
        &mut self,
        token: RequestToken,
        result: Result<ChatResponse, CommunicationError>,
    ) -> SessionEffect {
        let effect = self.session.resolve(token, result);
        self.apply_actor_effects(&effect);
        effect
    }

    // The target stays engaged from dispatch until the session closes, so
    // follow-up turns in Displaying and Composing keep it facing the player.
    fn apply_actor_effects(&mut self, effect: &SessionEffect) {
        match effect {
            SessionEffect::Dispatched(outgoing) => self.registry.engage(&outgoing.target),
            SessionEffect::Closed { target, .. } => self.registry.release(target),
            SessionEffect::Opened { .. }
            | SessionEffect::Resolved { .. }
            | SessionEffect::Discarded { .. } => {}
        }
    }
}
