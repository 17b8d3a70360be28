//! Actor registry holding the player and every spawned NPC.
use bevy::prelude::*;

use super::components::{Actor, ActorId};

/// Player plus NPCs in stable spawn order. Iteration order is part of the
/// proximity contract, so NPCs are never reordered after registration.
#[derive(Debug, Clone)]
pub struct ActorRegistry {
    player: Actor,
    npcs: Vec<Actor>,
}

impl ActorRegistry {
    pub fn new(player: Actor) -> Self {
        Self {
            player,
            npcs: Vec::new(),
        }
    }

    /// Registers an NPC, refusing duplicate or reserved identities.
    pub fn register(&mut self, npc: Actor) -> bool {
        if npc.id.is_player() || self.npc(&npc.id).is_some() {
            return false;
        }
        self.npcs.push(npc);
        true
    }

    pub fn player(&self) -> &Actor {
        &self.player
    }

    pub fn npcs(&self) -> &[Actor] {
        &self.npcs
    }

    pub fn npc(&self, id: &ActorId) -> Option<&Actor> {
        self.npcs.iter().find(|npc| &npc.id == id)
    }

    fn npc_mut(&mut self, id: &ActorId) -> Option<&mut Actor> {
        self.npcs.iter_mut().find(|npc| &npc.id == id)
    }

    /// Looks up the player or an NPC.
    pub fn get(&self, id: &ActorId) -> Option<&Actor> {
        if id.is_player() {
            Some(&self.player)
        } else {
            self.npc(id)
        }
    }

    pub fn display_name(&self, id: &ActorId) -> Option<&str> {
        self.get(id).map(|actor| actor.display_name.as_str())
    }

    pub fn move_player(&mut self, direction: Vec2, delta_seconds: f32) {
        self.player.walk(direction, delta_seconds);
    }

    pub fn advance_npcs(&mut self, delta_seconds: f32) {
        let player_position = self.player.position;
        for npc in &mut self.npcs {
            npc.step(delta_seconds, player_position);
        }
    }

    /// Freezes an NPC for a conversation and turns it towards the player.
    pub fn engage(&mut self, id: &ActorId) {
        let player_position = self.player.position;
        if let Some(npc) = self.npc_mut(id) {
            npc.engage();
            npc.face_towards(player_position);
        }
    }

    pub fn release(&mut self, id: &ActorId) {
        if let Some(npc) = self.npc_mut(id) {
            npc.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npc::components::{Facing, MovementMode};

    fn npc(id: &str, position: Vec2) -> Actor {
        Actor::new(ActorId::new(id), id, position, MovementMode::Roaming, 40.0)
    }

    fn registry() -> ActorRegistry {
        ActorRegistry::new(Actor::new(
            ActorId::player(),
            "You",
            Vec2::ZERO,
            MovementMode::Stationary,
            100.0,
        ))
    }

    #[test]
    fn rejects_duplicate_and_reserved_ids() {
        let mut registry = registry();
        assert!(registry.register(npc("plato", Vec2::ZERO)));
        assert!(!registry.register(npc("Plato", Vec2::ONE)));
        assert!(!registry.register(npc("player", Vec2::ONE)));
        assert_eq!(registry.npcs().len(), 1);
    }

    #[test]
    fn engage_faces_player_and_release_resumes() {
        let mut registry = registry();
        registry.register(
            npc("turing", Vec2::new(50.0, 0.0)).with_patrol(vec![Vec2::new(90.0, 0.0)]),
        );
        let id = ActorId::new("turing");

        registry.engage(&id);
        registry.advance_npcs(1.0);
        let turing = registry.npc(&id).unwrap();
        assert!(turing.is_engaged());
        assert_eq!(turing.facing, Facing::Left);
        assert_eq!(turing.position, Vec2::new(50.0, 0.0));

        registry.release(&id);
        registry.advance_npcs(0.5);
        assert_eq!(registry.npc(&id).unwrap().position, Vec2::new(70.0, 0.0));
    }

    #[test]
    fn player_walks_at_its_speed() {
        let mut registry = registry();
        registry.move_player(Vec2::new(0.0, 2.0), 0.5);
        assert_eq!(registry.player().position, Vec2::new(0.0, 50.0));
        assert_eq!(registry.player().facing, Facing::Up);
        assert_eq!(registry.display_name(&ActorId::player()), Some("You"));
    }
}
