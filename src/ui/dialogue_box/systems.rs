// src/ui/dialogue_box/systems.rs
//
// Systems rendering the dialogue session into the dialogue box.

use bevy::prelude::*;

use crate::core::context::SimulationContext;
use crate::dialogue::{session::DialogueMode, status::DialogueBackendStatus};

use super::components::{
    DialogueBox, DialogueBoxSettings, DialogueBoxSlot, DialogueBoxText, InteractionPrompt,
};

// Visual constants
const BACKGROUND_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 0.9);
const BORDER_COLOR: Color = Color::srgb(0.3, 0.3, 0.3);
const TEXT_COLOR: Color = Color::WHITE;
const NAME_COLOR: Color = Color::srgb(1.0, 0.9, 0.4); // Yellow/gold
const HINT_COLOR: Color = Color::srgb(0.65, 0.65, 0.65);
const UNREACHABLE_HINT: &str = "Philosopher API unreachable";

/// Spawns the hidden dialogue box and the idle prompt once at start-up.
pub fn spawn_dialogue_box(mut commands: Commands, settings: Res<DialogueBoxSettings>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(settings.bottom_offset),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-settings.width / 2.0)),
                width: Val::Px(settings.width),
                min_height: Val::Px(settings.min_height),
                padding: UiRect::all(Val::Px(settings.padding)),
                border: UiRect::all(Val::Px(settings.border_width)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            BorderColor::from(BORDER_COLOR),
            Visibility::Hidden,
            DialogueBox,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: settings.header_font_size,
                    ..default()
                },
                TextColor(NAME_COLOR),
                DialogueBoxText {
                    slot: DialogueBoxSlot::Header,
                },
            ));

            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: settings.body_font_size,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                Node {
                    max_width: Val::Px(settings.width - settings.padding * 2.0),
                    flex_grow: 1.0,
                    ..default()
                },
                DialogueBoxText {
                    slot: DialogueBoxSlot::Body,
                },
            ));

            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: settings.hint_font_size,
                    ..default()
                },
                TextColor(HINT_COLOR),
                DialogueBoxText {
                    slot: DialogueBoxSlot::Hint,
                },
            ));
        });

    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(settings.bottom_offset),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: settings.prompt_font_size,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                BackgroundColor(BACKGROUND_COLOR),
                Node {
                    padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                    ..default()
                },
                Visibility::Hidden,
                InteractionPrompt,
            ));
        });
}

/// Shows the box outside `Idle` and fills header, body, and hint.
pub fn update_dialogue_box(
    context: Res<SimulationContext>,
    status: Res<DialogueBackendStatus>,
    mut boxes: Query<&mut Visibility, With<DialogueBox>>,
    mut texts: Query<(&DialogueBoxText, &mut Text), Without<InteractionPrompt>>,
) {
    let session = context.session();
    let visible = session.is_visible();

    for mut visibility in boxes.iter_mut() {
        set_visibility(&mut visibility, visible);
    }
    if !visible {
        return;
    }

    let header = session
        .target()
        .and_then(|id| context.registry().display_name(id))
        .unwrap_or_default();
    let hint = hint_text(session.mode(), status.is_unreachable());

    for (slot, mut text) in texts.iter_mut() {
        let value = match slot.slot {
            DialogueBoxSlot::Header => header,
            DialogueBoxSlot::Body => session.rendered_text(),
            DialogueBoxSlot::Hint => hint.as_str(),
        };
        if text.0 != value {
            text.0 = value.to_string();
        }
    }
}

/// Shows "Press Space to talk to ..." while idle with an NPC in range.
pub fn update_interaction_prompt(
    context: Res<SimulationContext>,
    mut prompts: Query<(&mut Visibility, &mut Text), (With<InteractionPrompt>, Without<DialogueBox>)>,
) {
    let name = if context.session().mode() == DialogueMode::Idle {
        context
            .proximity()
            .target()
            .and_then(|id| context.registry().display_name(id))
    } else {
        None
    };

    for (mut visibility, mut text) in prompts.iter_mut() {
        set_visibility(&mut visibility, name.is_some());
        if let Some(name) = name {
            let prompt = prompt_text(name);
            if text.0 != prompt {
                text.0 = prompt;
            }
        }
    }
}

fn set_visibility(visibility: &mut Visibility, visible: bool) {
    let next = if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    if *visibility != next {
        *visibility = next;
    }
}

fn hint_text(mode: DialogueMode, unreachable: bool) -> String {
    let keys = match mode {
        DialogueMode::Idle => "",
        DialogueMode::Composing => "Enter to send | Esc to leave",
        DialogueMode::Awaiting => "Waiting for a reply... | Esc to leave",
        DialogueMode::Displaying => "Enter to reply | Esc to leave",
    };
    if unreachable && mode != DialogueMode::Idle {
        format!("{} | {}", keys, UNREACHABLE_HINT)
    } else {
        keys.to_string()
    }
}

fn prompt_text(name: &str) -> String {
    format!("Press Space to talk to {}", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dialogue::{session::DialogueInput, settings::DialogueSettings},
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
            ActorId::new("descartes"),
            "René Descartes",
            Vec2::new(30.0, 0.0),
            MovementMode::Stationary,
            0.0,
        ));
        let mut context = SimulationContext::new(registry, &DialogueSettings::default());
        context.tick(std::time::Duration::ZERO);

        let mut app = App::new();
        app.insert_resource(context)
            .init_resource::<DialogueBackendStatus>()
            .insert_resource(DialogueBoxSettings::default())
            .add_systems(Startup, spawn_dialogue_box)
            .add_systems(Update, (update_dialogue_box, update_interaction_prompt));
        app
    }

    fn box_visibility(app: &mut App) -> Visibility {
        let world = app.world_mut();
        *world
            .query_filtered::<&Visibility, With<DialogueBox>>()
            .single(world)
            .expect("dialogue box spawned")
    }

    fn slot_text(app: &mut App, wanted: DialogueBoxSlot) -> String {
        let world = app.world_mut();
        world
            .query::<(&DialogueBoxText, &Text)>()
            .iter(world)
            .find(|(slot, _)| slot.slot == wanted)
            .map(|(_, text)| text.0.clone())
            .expect("slot spawned")
    }

    fn prompt(app: &mut App) -> (Visibility, String) {
        let world = app.world_mut();
        let (visibility, text) = world
            .query_filtered::<(&Visibility, &Text), With<InteractionPrompt>>()
            .single(world)
            .expect("prompt spawned");
        (*visibility, text.0.clone())
    }

    #[test]
    fn idle_hides_box_and_prompts_nearby_npc() {
        let mut app = app();
        app.update();

        assert_eq!(box_visibility(&mut app), Visibility::Hidden);
        let (visibility, text) = prompt(&mut app);
        assert_eq!(visibility, Visibility::Inherited);
        assert_eq!(text, "Press Space to talk to René Descartes");
    }

    #[test]
    fn composing_shows_target_and_buffer() {
        let mut app = app();
        {
            let mut context = app.world_mut().resource_mut::<SimulationContext>();
            context.handle_input(DialogueInput::Engage);
            for ch in "Cogito".chars() {
                context.handle_input(DialogueInput::Type(ch));
            }
        }
        app.update();

        assert_eq!(box_visibility(&mut app), Visibility::Inherited);
        assert_eq!(slot_text(&mut app, DialogueBoxSlot::Header), "René Descartes");
        assert_eq!(slot_text(&mut app, DialogueBoxSlot::Body), "Cogito");
        assert_eq!(
            slot_text(&mut app, DialogueBoxSlot::Hint),
            "Enter to send | Esc to leave"
        );
        assert_eq!(prompt(&mut app).0, Visibility::Hidden);
    }

    #[test]
    fn awaiting_shows_loading_text_and_unreachable_hint() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<DialogueBackendStatus>()
            .record_outcome(false);
        {
            let mut context = app.world_mut().resource_mut::<SimulationContext>();
            context.handle_input(DialogueInput::Engage);
            context.handle_input(DialogueInput::Type('?'));
            context.handle_input(DialogueInput::Submit);
        }
        app.update();

        assert_eq!(
            slot_text(&mut app, DialogueBoxSlot::Body),
            DialogueSettings::default().session.loading_text
        );
        assert_eq!(
            slot_text(&mut app, DialogueBoxSlot::Hint),
            "Waiting for a reply... | Esc to leave | Philosopher API unreachable"
        );
    }

    #[test]
    fn hints_follow_mode() {
        assert_eq!(hint_text(DialogueMode::Idle, true), "");
        assert_eq!(
            hint_text(DialogueMode::Displaying, false),
            "Enter to reply | Esc to leave"
        );
    }
}
