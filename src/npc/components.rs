//! Actor identity, facing, and movement data shared by the player and NPCs.
use std::fmt;

use bevy::prelude::*;
use serde::Deserialize;

const PLAYER_ID: &str = "player";
const ARRIVAL_EPSILON: f32 = 0.5;
const FACING_EPSILON: f32 = 1e-4;

/// Identity of an actor. NPC identities double as the backend `philosopher_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorId(String);

impl ActorId {
    /// Identities are case-insensitive, so they are stored lower-cased.
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_lowercase())
    }

    pub fn player() -> Self {
        Self(PLAYER_ID.to_string())
    }

    pub fn is_player(&self) -> bool {
        self.0 == PLAYER_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cardinal direction an actor is facing (y axis points up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Picks the facing along the dominant axis of `direction`, or `None` for a zero vector.
    pub fn from_vector(direction: Vec2) -> Option<Self> {
        if direction.length_squared() <= FACING_EPSILON {
            return None;
        }

        let facing = if direction.x.abs() > direction.y.abs() {
            if direction.x > 0.0 {
                Self::Right
            } else {
                Self::Left
            }
        } else if direction.y > 0.0 {
            Self::Up
        } else {
            Self::Down
        };
        Some(facing)
    }

    pub fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::Y,
            Self::Down => Vec2::NEG_Y,
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
        }
    }
}

/// How an NPC behaves when it is not engaged in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementMode {
    #[default]
    Roaming,
    Stationary,
    FacingPlayer,
}

/// A player or NPC living in the actor registry.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub display_name: String,
    pub position: Vec2,
    pub facing: Facing,
    pub movement: MovementMode,
    pub speed: f32,
    patrol: Vec<Vec2>,
    next_waypoint: usize,
    engaged: bool,
}

impl Actor {
    pub fn new(
        id: ActorId,
        display_name: impl Into<String>,
        position: Vec2,
        movement: MovementMode,
        speed: f32,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            position,
            facing: Facing::default(),
            movement,
            speed: speed.max(0.0),
            patrol: Vec::new(),
            next_waypoint: 0,
            engaged: false,
        }
    }

    /// Waypoints walked in a closed loop while roaming.
    pub fn with_patrol(mut self, patrol: Vec<Vec2>) -> Self {
        self.patrol = patrol;
        self.next_waypoint = 0;
        self
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn patrol(&self) -> &[Vec2] {
        &self.patrol
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Suspends autonomous movement until [`Actor::release`] is called.
    pub fn engage(&mut self) {
        self.engaged = true;
    }

    pub fn release(&mut self) {
        self.engaged = false;
    }

    pub fn face_towards(&mut self, target: Vec2) {
        if let Some(facing) = Facing::from_vector(target - self.position) {
            self.facing = facing;
        }
    }

    /// Moves the actor along `direction` (normalised here) for `delta_seconds`.
    pub fn walk(&mut self, direction: Vec2, delta_seconds: f32) {
        let Some(facing) = Facing::from_vector(direction) else {
            return;
        };
        self.facing = facing;
        self.position += direction.normalize() * self.speed * delta_seconds;
    }

    /// Advances autonomous behaviour by one tick.
    pub fn step(&mut self, delta_seconds: f32, player_position: Vec2) {
        if self.engaged {
            self.face_towards(player_position);
            return;
        }

        match self.movement {
            MovementMode::Stationary => {}
            MovementMode::FacingPlayer => self.face_towards(player_position),
            MovementMode::Roaming => self.advance_patrol(delta_seconds),
        }
    }

    fn advance_patrol(&mut self, delta_seconds: f32) {
        if self.patrol.is_empty() {
            return;
        }

        let mut budget = self.speed * delta_seconds;
        // Bounded by the waypoint count so a zero-length loop cannot spin forever.
        for _ in 0..self.patrol.len() {
            let waypoint = self.patrol[self.next_waypoint];
            let offset = waypoint - self.position;
            let distance = offset.length();

            if distance <= ARRIVAL_EPSILON {
                self.next_waypoint = (self.next_waypoint + 1) % self.patrol.len();
                continue;
            }

            if let Some(facing) = Facing::from_vector(offset) {
                self.facing = facing;
            }

            if budget >= distance {
                self.position = waypoint;
                budget -= distance;
                self.next_waypoint = (self.next_waypoint + 1) % self.patrol.len();
            } else {
                self.position += offset / distance * budget;
                break;
            }
        }
    }
}

/// Links a rendered sprite to the actor it draws.
#[derive(Component, Debug, Clone)]
pub struct ActorSprite {
    pub id: ActorId,
}

/// Small marker drawn in front of an actor to show its facing.
#[derive(Component, Debug, Clone)]
pub struct FacingIndicator {
    pub owner: ActorId,
}
