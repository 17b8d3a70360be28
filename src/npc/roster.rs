//! Spawn roster for the player and the philosopher NPCs.
use std::{collections::HashSet, fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

use super::{
    components::{Actor, ActorId, MovementMode},
    registry::ActorRegistry,
};

const CONFIG_PATH: &str = "config/actors.toml";
const MAX_ID_LEN: usize = 100;
const DEFAULT_PLAYER_SPEED: f32 = 220.0;
const DEFAULT_NPC_SPEED: f32 = 45.0;
const DEFAULT_PATROL_HALF_EXTENT: f32 = 60.0;

const DEFAULT_NPCS: [(&str, &str, [f32; 2], MovementMode); 8] = [
    ("aristotle", "Aristotle", [180.0, 60.0], MovementMode::Roaming),
    ("plato", "Plato", [-220.0, 140.0], MovementMode::Roaming),
    ("descartes", "Rene Descartes", [320.0, -180.0], MovementMode::FacingPlayer),
    ("leibniz", "Gottfried Wilhelm Leibniz", [-360.0, -220.0], MovementMode::Roaming),
    ("ada_lovelace", "Ada Lovelace", [20.0, 320.0], MovementMode::Stationary),
    ("turing", "Alan Turing", [460.0, 200.0], MovementMode::Roaming),
    ("chomsky", "Noam Chomsky", [-520.0, 60.0], MovementMode::FacingPlayer),
    ("searle", "John Searle", [-80.0, -360.0], MovementMode::Stationary),
];

#[derive(Debug, Clone, Deserialize, Default)]
struct RawRoster {
    #[serde(default)]
    player: RawPlayer,
    #[serde(default)]
    npc: Vec<RawNpc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPlayer {
    spawn: [f32; 2],
    speed: f32,
}

impl Default for RawPlayer {
    fn default() -> Self {
        Self {
            spawn: [0.0, 0.0],
            speed: DEFAULT_PLAYER_SPEED,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawNpc {
    id: String,
    name: Option<String>,
    spawn: [f32; 2],
    #[serde(default)]
    movement: MovementMode,
    speed: Option<f32>,
    #[serde(default)]
    patrol: Vec<[f32; 2]>,
}

/// Spawn data for a single NPC.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPoint {
    pub id: ActorId,
    pub display_name: String,
    pub position: Vec2,
    pub movement: MovementMode,
    pub speed: f32,
    pub patrol: Vec<Vec2>,
}

impl SpawnPoint {
    fn into_actor(self) -> Actor {
        let patrol = if self.movement == MovementMode::Roaming && self.patrol.is_empty() {
            default_patrol(self.position)
        } else {
            self.patrol
        };
        Actor::new(
            self.id,
            self.display_name,
            self.position,
            self.movement,
            self.speed,
        )
        .with_patrol(patrol)
    }
}

/// Player spawn plus NPC spawn points, in registration order.
#[derive(Debug, Clone)]
pub struct ActorRoster {
    pub player_spawn: Vec2,
    pub player_speed: f32,
    pub npcs: Vec<SpawnPoint>,
}

impl ActorRoster {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(data) => Self::parse(&data).unwrap_or_else(|err| {
                warn!(
                    "Failed to parse {} ({}). Falling back to the built-in roster.",
                    CONFIG_PATH, err
                );
                Self::default()
            }),
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to the built-in roster.",
                    CONFIG_PATH, err
                );
                Self::default()
            }
        }
    }

    pub fn parse(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawRoster>(data).map(Self::from)
    }

    /// Builds the registry; NPCs appear in roster order.
    pub fn into_registry(self) -> ActorRegistry {
        let player = Actor::new(
            ActorId::player(),
            "You",
            self.player_spawn,
            MovementMode::Stationary,
            self.player_speed,
        );
        let mut registry = ActorRegistry::new(player);
        for spawn in self.npcs {
            let id = spawn.id.clone();
            if !registry.register(spawn.into_actor()) {
                warn!("Skipping NPC {} that could not be registered", id);
            }
        }
        registry
    }
}

impl Default for ActorRoster {
    fn default() -> Self {
        let npcs = DEFAULT_NPCS
            .iter()
            .map(|(id, name, [x, y], movement)| SpawnPoint {
                id: ActorId::new(id),
                display_name: name.to_string(),
                position: Vec2::new(*x, *y),
                movement: *movement,
                speed: DEFAULT_NPC_SPEED,
                patrol: Vec::new(),
            })
            .collect();

        Self {
            player_spawn: Vec2::ZERO,
            player_speed: DEFAULT_PLAYER_SPEED,
            npcs,
        }
    }
}

impl From<RawRoster> for ActorRoster {
    fn from(value: RawRoster) -> Self {
        let mut seen = HashSet::new();
        let mut npcs = Vec::with_capacity(value.npc.len());

        for raw in value.npc {
            let id = ActorId::new(&raw.id);
            if id.as_str().is_empty() || id.as_str().len() > MAX_ID_LEN {
                warn!("Skipping NPC with invalid id {:?}", raw.id);
                continue;
            }
            if id.is_player() {
                warn!("Skipping NPC using the reserved id {}", id);
                continue;
            }
            let position = Vec2::from_array(raw.spawn);
            let patrol: Vec<Vec2> = raw.patrol.into_iter().map(Vec2::from_array).collect();
            if !position.is_finite() || !patrol.iter().all(|waypoint| waypoint.is_finite()) {
                warn!("Skipping NPC {} with a non-finite spawn or patrol point", id);
                continue;
            }
            if !seen.insert(id.clone()) {
                warn!("Skipping duplicate NPC id {}", id);
                continue;
            }

            npcs.push(SpawnPoint {
                display_name: raw.name.unwrap_or_else(|| raw.id.trim().to_string()),
                id,
                position,
                movement: raw.movement,
                speed: valid_speed(raw.speed).unwrap_or(DEFAULT_NPC_SPEED),
                patrol,
            });
        }

        let mut player_spawn = Vec2::from_array(value.player.spawn);
        if !player_spawn.is_finite() {
            warn!("Player spawn {:?} is not finite. Spawning at the origin.", player_spawn);
            player_spawn = Vec2::ZERO;
        }

        Self {
            player_spawn,
            player_speed: valid_speed(Some(value.player.speed)).unwrap_or(DEFAULT_PLAYER_SPEED),
            npcs,
        }
    }
}

fn valid_speed(speed: Option<f32>) -> Option<f32> {
    speed.filter(|speed| speed.is_finite() && *speed >= 0.0)
}

fn default_patrol(origin: Vec2) -> Vec<Vec2> {
    let e = DEFAULT_PATROL_HALF_EXTENT;
    vec![
        origin + Vec2::new(e, 0.0),
        origin + Vec2::new(e, e),
        origin + Vec2::new(0.0, e),
        origin,
    ]
}
