//! Proximity tracking between the player and NPCs.
use bevy::prelude::*;

use crate::{
    dialogue::settings::{ProximitySettings, TieBreak},
    npc::{components::ActorId, registry::ActorRegistry},
};

/// NPC found inside the engagement radius.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityHit {
    pub id: ActorId,
    pub distance: f32,
}

/// Returns the engageable NPC for `player`, if any.
///
/// Only NPCs strictly closer than `radius` qualify. With
/// [`TieBreak::FirstMatch`] the first qualifying NPC in iteration order wins
/// even when a later one is closer; [`TieBreak::Nearest`] picks the closest
/// and falls back to iteration order on exact ties.
pub fn nearest_in_range<'a>(
    player: Vec2,
    npcs: impl IntoIterator<Item = (&'a ActorId, Vec2)>,
    radius: f32,
    tie_break: TieBreak,
) -> Option<ProximityHit> {
    let mut best: Option<(&ActorId, f32)> = None;

    for (id, position) in npcs {
        let distance = player.distance(position);
        // NaN compares false both ways and must never count as in range.
        if distance.is_nan() || distance >= radius {
            continue;
        }

        match tie_break {
            TieBreak::FirstMatch => {
                best = Some((id, distance));
                break;
            }
            TieBreak::Nearest => {
                if best.is_none_or(|(_, current)| distance < current) {
                    best = Some((id, distance));
                }
            }
        }
    }

    best.map(|(id, distance)| ProximityHit {
        id: id.clone(),
        distance,
    })
}

/// Engageable NPC for the current tick. Recomputed every tick, never persisted.
#[derive(Debug, Clone, Default)]
pub struct ProximityState {
    current: Option<ProximityHit>,
}

impl ProximityState {
    /// Recomputes the target and reports whether the engageable NPC changed.
    pub fn refresh(&mut self, registry: &ActorRegistry, settings: &ProximitySettings) -> bool {
        let hit = nearest_in_range(
            registry.player().position,
            registry.npcs().iter().map(|npc| (&npc.id, npc.position)),
            settings.engagement_radius,
            settings.tie_break,
        );

        let changed = self.target() != hit.as_ref().map(|hit| &hit.id);
        self.current = hit;
        changed
    }

    pub fn target(&self) -> Option<&ActorId> {
        self.current.as_ref().map(|hit| &hit.id)
    }

    pub fn distance(&self) -> Option<f32> {
        self.current.as_ref().map(|hit| hit.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> [ActorId; 3] {
        [
            ActorId::new("aristotle"),
            ActorId::new("plato"),
            ActorId::new("turing"),
        ]
    }

    #[test]
    fn none_when_nobody_is_in_range() {
        let ids = ids();
        let npcs = [
            (&ids[0], Vec2::new(150.0, 0.0)),
            (&ids[1], Vec2::new(0.0, -300.0)),
        ];
        assert_eq!(
            nearest_in_range(Vec2::ZERO, npcs, 100.0, TieBreak::FirstMatch),
            None
        );
    }

    #[test]
    fn radius_is_exclusive() {
        let ids = ids();
        let npcs = [(&ids[0], Vec2::new(100.0, 0.0))];
        assert_eq!(
            nearest_in_range(Vec2::ZERO, npcs, 100.0, TieBreak::Nearest),
            None
        );

        let npcs = [(&ids[0], Vec2::new(99.9, 0.0))];
        assert!(nearest_in_range(Vec2::ZERO, npcs, 100.0, TieBreak::Nearest).is_some());
    }

    #[test]
    fn first_match_prefers_iteration_order() {
        let ids = ids();
        let npcs = [
            (&ids[0], Vec2::new(200.0, 0.0)),
            (&ids[1], Vec2::new(80.0, 0.0)),
            (&ids[2], Vec2::new(10.0, 0.0)),
        ];

        let hit = nearest_in_range(Vec2::ZERO, npcs, 100.0, TieBreak::FirstMatch).unwrap();
        assert_eq!(hit.id, ids[1]);
        assert_eq!(hit.distance, 80.0);

        let hit = nearest_in_range(Vec2::ZERO, npcs, 100.0, TieBreak::Nearest).unwrap();
        assert_eq!(hit.id, ids[2]);
    }

    #[test]
    fn nearest_breaks_exact_ties_by_order() {
        let ids = ids();
        let npcs = [
            (&ids[0], Vec2::new(0.0, 50.0)),
            (&ids[1], Vec2::new(50.0, 0.0)),
        ];
        let hit = nearest_in_range(Vec2::ZERO, npcs, 100.0, TieBreak::Nearest).unwrap();
        assert_eq!(hit.id, ids[0]);
    }

    #[test]
    fn non_finite_positions_are_never_in_range() {
        let ids = ids();
        let npcs = [
            (&ids[0], Vec2::new(f32::NAN, 0.0)),
            (&ids[1], Vec2::new(f32::INFINITY, 0.0)),
            (&ids[2], Vec2::new(30.0, 0.0)),
        ];

        for tie_break in [TieBreak::FirstMatch, TieBreak::Nearest] {
            let hit = nearest_in_range(Vec2::ZERO, npcs, 100.0, tie_break).unwrap();
            assert_eq!(hit.id, ids[2]);
            assert_eq!(hit.distance, 30.0);
        }
        assert_eq!(
            nearest_in_range(Vec2::ZERO, [npcs[0]], 100.0, TieBreak::FirstMatch),
            None
        );
    }

    #[test]
    fn any_hit_is_strictly_inside_the_radius() {
        let ids = ids();
        let npcs = [
            (&ids[0], Vec2::new(-120.0, 40.0)),
            (&ids[1], Vec2::new(60.0, 60.0)),
            (&ids[2], Vec2::new(250.0, -90.0)),
        ];

        for x in (-400..=400).step_by(25) {
            for y in (-400..=400).step_by(25) {
                let player = Vec2::new(x as f32, y as f32);
                for tie_break in [TieBreak::FirstMatch, TieBreak::Nearest] {
                    if let Some(hit) = nearest_in_range(player, npcs, 100.0, tie_break) {
                        let position = npcs
                            .iter()
                            .find(|(id, _)| **id == hit.id)
                            .map(|(_, position)| *position)
                            .unwrap();
                        assert!(player.distance(position) < 100.0);
                    }
                }
            }
        }
    }
}
