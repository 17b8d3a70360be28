//! Systems moving the player and advancing the shared simulation context.
use bevy::log::debug;
use bevy::prelude::*;

use crate::{
    core::{context::SimulationContext, plugin::SimulationClock},
    dialogue::events::DialogueSessionEvent,
};

/// Moves the player from the arrow keys. Runs in every dialogue mode.
pub fn move_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    clock: Res<SimulationClock>,
    mut context: ResMut<SimulationContext>,
) {
    let direction = arrow_direction(&keyboard);
    if direction == Vec2::ZERO {
        return;
    }
    context.move_player(direction, clock.last_delta());
}

fn arrow_direction(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let mut direction = Vec2::ZERO;
    if keyboard.pressed(KeyCode::ArrowUp) {
        direction.y += 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowDown) {
        direction.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowLeft) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowRight) {
        direction.x += 1.0;
    }
    direction
}

/// Advances NPCs, recomputes proximity, and runs the response timeout.
pub fn tick_simulation(
    clock: Res<SimulationClock>,
    mut context: ResMut<SimulationContext>,
    mut session_events: MessageWriter<DialogueSessionEvent>,
) {
    let outcome = context.tick(clock.last_delta());

    if outcome.proximity_changed {
        match (context.proximity().target(), context.proximity().distance()) {
            (Some(target), Some(distance)) => {
                debug!("Player is near {} (distance: {:.1})", target, distance);
            }
            _ => debug!("No NPC within engagement range"),
        }
    }

    if let Some(effect) = outcome.effect {
        session_events.write(DialogueSessionEvent { effect });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        dialogue::settings::DialogueSettings,
        npc::{
            components::{Actor, ActorId, MovementMode},
            registry::ActorRegistry,
        },
    };

    fn app() -> App {
        let mut registry = ActorRegistry::new(Actor::new(
            ActorId::player(),
            "You",
            Vec2::ZERO,
            MovementMode::Stationary,
            100.0,
        ));
        registry.register(Actor::new(
            ActorId::new("socrates"),
            "Socrates",
            Vec2::new(60.0, 0.0),
            MovementMode::FacingPlayer,
            0.0,
        ));

        let mut app = App::new();
        app.add_message::<DialogueSessionEvent>()
            .init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(SimulationClock::default())
            .insert_resource(SimulationContext::new(
                registry,
                &DialogueSettings::default(),
            ))
            .add_systems(Update, (move_player, tick_simulation).chain());
        app
    }

    #[test]
    fn arrow_keys_combine_into_direction() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ArrowUp);
        keyboard.press(KeyCode::ArrowLeft);
        assert_eq!(arrow_direction(&keyboard), Vec2::new(-1.0, 1.0));

        keyboard.press(KeyCode::ArrowDown);
        assert_eq!(arrow_direction(&keyboard), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn held_arrow_moves_player_by_clock_delta() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<SimulationClock>()
            .tick(Duration::from_millis(100));
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ArrowRight);

        app.update();

        let context = app.world().resource::<SimulationContext>();
        let position = context.registry().player().position;
        assert!((position.x - 10.0).abs() < 1e-3, "moved to {position:?}");
        assert_eq!(context.proximity().target(), Some(&ActorId::new("socrates")));
    }

    #[test]
    fn tick_refreshes_proximity_without_input() {
        let mut app = app();
        app.update();

        let context = app.world().resource::<SimulationContext>();
        assert_eq!(context.proximity().target(), Some(&ActorId::new("socrates")));
    }
}
