//! Maps raw key presses onto dialogue inputs for the current mode.
use bevy::input::keyboard::Key;

use super::session::{DialogueInput, DialogueMode};

/// Key presses the dialogue layer cares about; everything else is dropped
/// before it reaches the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStroke {
    Char(char),
    Space,
    Enter,
    Escape,
    Backspace,
}

impl KeyStroke {
    /// Multi-character keys (dead keys, IME commits) yield one stroke per
    /// printable character.
    pub fn from_logical_key(key: &Key) -> Vec<Self> {
        match key {
            Key::Space => vec![Self::Space],
            Key::Enter => vec![Self::Enter],
            Key::Escape => vec![Self::Escape],
            Key::Backspace => vec![Self::Backspace],
            Key::Character(text) => text
                .chars()
                .filter(|ch| !ch.is_control())
                .map(Self::Char)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Gates key presses by mode: Space engages only from `Idle`, typing is only
/// live while composing, and `Awaiting` accepts nothing but cancel.
pub fn interpret(mode: DialogueMode, stroke: KeyStroke) -> Option<DialogueInput> {
    match (mode, stroke) {
        (DialogueMode::Idle, KeyStroke::Space) => Some(DialogueInput::Engage),
        (DialogueMode::Idle, _) => None,
        (_, KeyStroke::Escape) => Some(DialogueInput::Cancel),
        (DialogueMode::Composing, KeyStroke::Char(ch)) => Some(DialogueInput::Type(ch)),
        (DialogueMode::Composing, KeyStroke::Space) => Some(DialogueInput::Type(' ')),
        (DialogueMode::Composing, KeyStroke::Backspace) => Some(DialogueInput::Backspace),
        (DialogueMode::Composing | DialogueMode::Displaying, KeyStroke::Enter) => {
            Some(DialogueInput::Submit)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_only_engages_on_space() {
        assert_eq!(
            interpret(DialogueMode::Idle, KeyStroke::Space),
            Some(DialogueInput::Engage)
        );
        for stroke in [
            KeyStroke::Char('a'),
            KeyStroke::Enter,
            KeyStroke::Escape,
            KeyStroke::Backspace,
        ] {
            assert_eq!(interpret(DialogueMode::Idle, stroke), None);
        }
    }

    #[test]
    fn composing_types_space_instead_of_engaging() {
        assert_eq!(
            interpret(DialogueMode::Composing, KeyStroke::Space),
            Some(DialogueInput::Type(' '))
        );
        assert_eq!(
            interpret(DialogueMode::Composing, KeyStroke::Char('q')),
            Some(DialogueInput::Type('q'))
        );
        assert_eq!(
            interpret(DialogueMode::Composing, KeyStroke::Enter),
            Some(DialogueInput::Submit)
        );
    }

    #[test]
    fn awaiting_accepts_only_cancel() {
        assert_eq!(
            interpret(DialogueMode::Awaiting, KeyStroke::Escape),
            Some(DialogueInput::Cancel)
        );
        for stroke in [
            KeyStroke::Char('a'),
            KeyStroke::Space,
            KeyStroke::Enter,
            KeyStroke::Backspace,
        ] {
            assert_eq!(interpret(DialogueMode::Awaiting, stroke), None);
        }
    }

    #[test]
    fn displaying_accepts_reply_and_cancel() {
        assert_eq!(
            interpret(DialogueMode::Displaying, KeyStroke::Enter),
            Some(DialogueInput::Submit)
        );
        assert_eq!(
            interpret(DialogueMode::Displaying, KeyStroke::Escape),
            Some(DialogueInput::Cancel)
        );
        assert_eq!(interpret(DialogueMode::Displaying, KeyStroke::Char('a')), None);
    }

    #[test]
    fn logical_keys_map_to_strokes() {
        assert_eq!(
            KeyStroke::from_logical_key(&Key::Character("é".into())),
            vec![KeyStroke::Char('é')]
        );
        assert_eq!(
            KeyStroke::from_logical_key(&Key::Character("ab".into())),
            vec![KeyStroke::Char('a'), KeyStroke::Char('b')]
        );
        assert!(KeyStroke::from_logical_key(&Key::Character("\u{7}".into())).is_empty());
        assert_eq!(
            KeyStroke::from_logical_key(&Key::Escape),
            vec![KeyStroke::Escape]
        );
        assert!(KeyStroke::from_logical_key(&Key::ArrowUp).is_empty());
    }
}
