//! Systems drawing actors from the registry.
use bevy::prelude::*;

use crate::core::context::SimulationContext;

use super::components::{Actor, ActorSprite, FacingIndicator};

const ACTOR_SIZE: Vec2 = Vec2::new(28.0, 36.0);
const INDICATOR_SIZE: Vec2 = Vec2::new(8.0, 8.0);
const INDICATOR_OFFSET: f32 = 24.0;
const LABEL_OFFSET: f32 = 30.0;
const ACTOR_Z: f32 = 1.0;
const INDICATOR_Z: f32 = 2.0;

const PLAYER_COLOR: Color = Color::srgb(0.95, 0.85, 0.35);
const NPC_PALETTE: [Color; 4] = [
    Color::srgb(0.80, 0.35, 0.35),
    Color::srgb(0.35, 0.55, 0.85),
    Color::srgb(0.45, 0.75, 0.45),
    Color::srgb(0.70, 0.50, 0.80),
];
const ENGAGED_TINT: Color = Color::srgb(1.0, 1.0, 1.0);

/// Spawns one sprite with a name label plus a facing indicator per actor.
pub fn spawn_actor_sprites(mut commands: Commands, context: Res<SimulationContext>) {
    let registry = context.registry();

    spawn_actor(&mut commands, registry.player(), PLAYER_COLOR);
    for (index, npc) in registry.npcs().iter().enumerate() {
        spawn_actor(&mut commands, npc, npc_color(index));
    }

    info!(
        "Spawned sprites for player and {} NPCs",
        registry.npcs().len()
    );
}

fn spawn_actor(commands: &mut Commands, actor: &Actor, color: Color) {
    commands
        .spawn((
            Sprite::from_color(color, ACTOR_SIZE),
            Transform::from_translation(actor.position.extend(ACTOR_Z)),
            ActorSprite {
                id: actor.id.clone(),
            },
            Name::new(format!("{} ({})", actor.display_name, actor.id)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text2d::new(actor.display_name.clone()),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Transform::from_xyz(0.0, LABEL_OFFSET, 0.0),
            ));
        });

    commands.spawn((
        Sprite::from_color(Color::BLACK, INDICATOR_SIZE),
        Transform::from_translation(indicator_position(actor).extend(INDICATOR_Z)),
        FacingIndicator {
            owner: actor.id.clone(),
        },
    ));
}

/// Copies registry positions and facings onto the rendered entities.
pub fn sync_actor_sprites(
    context: Res<SimulationContext>,
    mut sprites: Query<(&ActorSprite, &mut Transform, &mut Sprite), Without<FacingIndicator>>,
    mut indicators: Query<(&FacingIndicator, &mut Transform), Without<ActorSprite>>,
) {
    let registry = context.registry();

    for (marker, mut transform, mut sprite) in sprites.iter_mut() {
        let Some(actor) = registry.get(&marker.id) else {
            continue;
        };
        transform.translation = actor.position.extend(ACTOR_Z);

        if actor.is_engaged() {
            sprite.color = ENGAGED_TINT;
        } else if let Some(index) = registry.npcs().iter().position(|npc| npc.id == actor.id) {
            sprite.color = npc_color(index);
        }
    }

    for (indicator, mut transform) in indicators.iter_mut() {
        if let Some(actor) = registry.get(&indicator.owner) {
            transform.translation = indicator_position(actor).extend(INDICATOR_Z);
        }
    }
}

fn indicator_position(actor: &Actor) -> Vec2 {
    actor.position + actor.facing.unit() * INDICATOR_OFFSET
}

fn npc_color(index: usize) -> Color {
    NPC_PALETTE[index % NPC_PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dialogue::settings::DialogueSettings,
        npc::{
            components::{ActorId, Facing, MovementMode},
            registry::ActorRegistry,
        },
    };

    fn app_with_registry() -> App {
        let mut registry = ActorRegistry::new(Actor::new(
            ActorId::player(),
            "You",
            Vec2::ZERO,
            MovementMode::Stationary,
            100.0,
        ));
        registry.register(Actor::new(
            ActorId::new("plato"),
            "Plato",
            Vec2::new(50.0, 0.0),
            MovementMode::Stationary,
            0.0,
        ));

        let mut app = App::new();
        app.insert_resource(SimulationContext::new(
            registry,
            &DialogueSettings::default(),
        ))
        .add_systems(Startup, spawn_actor_sprites)
        .add_systems(Update, sync_actor_sprites);
        app
    }

    #[test]
    fn spawns_sprite_and_indicator_per_actor() {
        let mut app = app_with_registry();
        app.update();

        let world = app.world_mut();
        let sprites = world.query::<&ActorSprite>().iter(world).count();
        let indicators = world.query::<&FacingIndicator>().iter(world).count();
        assert_eq!(sprites, 2);
        assert_eq!(indicators, 2);
    }

    #[test]
    fn indicator_sits_in_front_of_actor() {
        let mut app = app_with_registry();
        app.update();

        let world = app.world_mut();
        let mut query = world.query::<(&FacingIndicator, &Transform)>();
        let (_, transform) = query
            .iter(world)
            .find(|(indicator, _)| indicator.owner == ActorId::new("plato"))
            .expect("plato indicator spawned");

        let expected = Vec2::new(50.0, 0.0) + Facing::Down.unit() * INDICATOR_OFFSET;
        assert_eq!(transform.translation.truncate(), expected);
    }
}
