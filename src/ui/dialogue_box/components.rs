// src/ui/dialogue_box/components.rs
//
// Components and resources for the dialogue box and the interaction prompt.

use bevy::prelude::*;

/// Root node of the dialogue box. Hidden while the session is idle.
#[derive(Component, Debug)]
pub struct DialogueBox;

/// Which line of the dialogue box a text entity renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueBoxSlot {
    /// Display name of the philosopher being addressed.
    Header,
    /// Typed buffer, loading text, or the reply.
    Body,
    /// Key hints for the current mode.
    Hint,
}

#[derive(Component, Debug)]
pub struct DialogueBoxText {
    pub slot: DialogueBoxSlot,
}

/// "Press Space to talk" line shown while idle near an NPC.
#[derive(Component, Debug)]
pub struct InteractionPrompt;

/// Layout settings for the dialogue box.
#[derive(Resource, Debug)]
pub struct DialogueBoxSettings {
    /// Box width (pixels).
    pub width: f32,

    /// Minimum box height (pixels).
    pub min_height: f32,

    /// Padding inside the box (pixels).
    pub padding: f32,

    /// Border width (pixels).
    pub border_width: f32,

    /// Offset from bottom edge of screen (pixels).
    pub bottom_offset: f32,

    pub header_font_size: f32,
    pub body_font_size: f32,
    pub hint_font_size: f32,
    pub prompt_font_size: f32,
}

impl Default for DialogueBoxSettings {
    fn default() -> Self {
        Self {
            width: 640.0,
            min_height: 140.0,
            padding: 14.0,
            border_width: 2.0,
            bottom_offset: 24.0,
            header_font_size: 20.0,
            body_font_size: 16.0,
            hint_font_size: 13.0,
            prompt_font_size: 16.0,
        }
    }
}
