//! Systems for the world module.
use bevy::prelude::*;

use crate::{
    core::{context::SimulationContext, plugin::SimulationClock},
    world::components::{Ground, MainCamera},
};

const GROUND_SIZE: Vec2 = Vec2::new(1600.0, 1200.0);
const PLAZA_SIZE: Vec2 = Vec2::new(520.0, 360.0);
const GROUND_Z: f32 = -10.0;
const PLAZA_Z: f32 = -9.0;

/// Spawns the town backdrop and a 2D camera centred on the player.
pub fn spawn_world_environment(mut commands: Commands, context: Res<SimulationContext>) {
    commands.spawn((
        Sprite::from_color(Color::srgb_u8(90, 140, 90), GROUND_SIZE),
        Transform::from_xyz(0.0, 0.0, GROUND_Z),
        Ground,
    ));

    commands.spawn((
        Sprite::from_color(Color::srgb_u8(170, 160, 130), PLAZA_SIZE),
        Transform::from_xyz(0.0, 0.0, PLAZA_Z),
        Ground,
    ));

    let start = context.registry().player().position;
    commands.spawn((
        Camera2d,
        Transform::from_xyz(start.x, start.y, 0.0),
        MainCamera::default(),
    ));
}

/// Eases the camera towards the player every frame.
pub fn follow_player_camera(
    clock: Res<SimulationClock>,
    context: Res<SimulationContext>,
    mut cameras: Query<(&MainCamera, &mut Transform)>,
) {
    let target = context.registry().player().position;
    let delta_seconds = clock.last_delta().as_secs_f32();

    if let Ok((camera, mut transform)) = cameras.single_mut() {
        let next = follow_step(
            transform.translation.truncate(),
            target,
            camera.follow_sharpness,
            delta_seconds,
        );
        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}

/// Frame-rate independent exponential smoothing.
fn follow_step(current: Vec2, target: Vec2, sharpness: f32, delta_seconds: f32) -> Vec2 {
    let blend = 1.0 - (-sharpness * delta_seconds).exp();
    current.lerp(target, blend.clamp(0.0, 1.0))
}
