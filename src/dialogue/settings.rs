//! Tunables for proximity and the dialogue session, loaded from `config/dialogue.toml`.
use std::{fs, path::Path, time::Duration};

use bevy::prelude::*;
use serde::Deserialize;

const CONFIG_PATH: &str = "config/dialogue.toml";
const DEFAULT_ENGAGEMENT_RADIUS: f32 = 100.0;
const DEFAULT_RESPONSE_TIMEOUT_SECS: f32 = 30.0;
// Matches the backend's request validation limit.
const DEFAULT_MAX_MESSAGE_CHARS: usize = 10_000;
const DEFAULT_LOADING_TEXT: &str = "Thinking...";
const DEFAULT_FALLBACK_TEXT: &str =
    "Forgive me, my thoughts have wandered off. Could you ask me again?";

/// Which NPC wins when several are inside the engagement radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    FirstMatch,
    Nearest,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct RawDialogueConfig {
    #[serde(default)]
    proximity: RawProximitySection,
    #[serde(default)]
    session: RawSessionSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawProximitySection {
    engagement_radius: f32,
    tie_break: TieBreak,
}

impl Default for RawProximitySection {
    fn default() -> Self {
        Self {
            engagement_radius: DEFAULT_ENGAGEMENT_RADIUS,
            tie_break: TieBreak::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSessionSection {
    response_timeout_secs: f32,
    max_message_chars: usize,
    loading_text: String,
    fallback_text: String,
}

impl Default for RawSessionSection {
    fn default() -> Self {
        Self {
            response_timeout_secs: DEFAULT_RESPONSE_TIMEOUT_SECS,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
            loading_text: DEFAULT_LOADING_TEXT.to_string(),
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProximitySettings {
    pub engagement_radius: f32,
    pub tie_break: TieBreak,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// `None` leaves `Awaiting` unbounded.
    pub response_timeout: Option<Duration>,
    pub max_message_chars: usize,
    pub loading_text: String,
    pub fallback_text: String,
}

/// Combined dialogue configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueSettings {
    pub proximity: ProximitySettings,
    pub session: SessionSettings,
}

impl DialogueSettings {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(data) => Self::parse(&data).unwrap_or_else(|err| {
                warn!(
                    "Failed to parse {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                Self::default()
            }),
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                Self::default()
            }
        }
    }

    pub fn parse(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawDialogueConfig>(data).map(Self::from)
    }
}

impl Default for DialogueSettings {
    fn default() -> Self {
        RawDialogueConfig::default().into()
    }
}

impl From<RawDialogueConfig> for DialogueSettings {
    fn from(value: RawDialogueConfig) -> Self {
        let proximity = value.proximity;
        let session = value.session;

        let engagement_radius = if proximity.engagement_radius.is_finite()
            && proximity.engagement_radius > 0.0
        {
            proximity.engagement_radius
        } else {
            DEFAULT_ENGAGEMENT_RADIUS
        };

        let response_timeout = response_timeout(session.response_timeout_secs);

        let loading_text = non_blank_or(session.loading_text, DEFAULT_LOADING_TEXT);
        let fallback_text = non_blank_or(session.fallback_text, DEFAULT_FALLBACK_TEXT);

        Self {
            proximity: ProximitySettings {
                engagement_radius,
                tie_break: proximity.tie_break,
            },
            session: SessionSettings {
                response_timeout,
                max_message_chars: session.max_message_chars.max(1),
                loading_text,
                fallback_text,
            },
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        DialogueSettings::default().session
    }
}

/// `0` (or any negative value) disables the timeout. Values that do not fit
/// a `Duration` fall back to the default.
fn response_timeout(secs: f32) -> Option<Duration> {
    if secs <= 0.0 {
        return None;
    }
    match Duration::try_from_secs_f32(secs) {
        Ok(timeout) => Some(timeout),
        Err(err) => {
            warn!(
                "Invalid response_timeout_secs {} in {} ({}). Using {}s.",
                secs, CONFIG_PATH, err, DEFAULT_RESPONSE_TIMEOUT_SECS
            );
            Some(Duration::from_secs_f32(DEFAULT_RESPONSE_TIMEOUT_SECS))
        }
    }
}

fn non_blank_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let settings = DialogueSettings::parse("").expect("empty config parses");
        assert_eq!(settings, DialogueSettings::default());
        assert_eq!(settings.proximity.engagement_radius, 100.0);
        assert_eq!(settings.proximity.tie_break, TieBreak::FirstMatch);
        assert_eq!(
            settings.session.response_timeout,
            Some(Duration::from_secs(30))
        );
        assert_eq!(settings.session.max_message_chars, 10_000);
    }

    #[test]
    fn parses_overrides_and_sanitises_values() {
        let settings = DialogueSettings::parse(
            r#"
            [proximity]
            engagement_radius = -4.0
            tie_break = "nearest"

            [session]
            response_timeout_secs = 0.0
            max_message_chars = 0
            loading_text = "   "
            fallback_text = "The oracle is silent."
            "#,
        )
        .expect("config parses");

        assert_eq!(settings.proximity.engagement_radius, 100.0);
        assert_eq!(settings.proximity.tie_break, TieBreak::Nearest);
        assert_eq!(settings.session.response_timeout, None);
        assert_eq!(settings.session.max_message_chars, 1);
        assert_eq!(settings.session.loading_text, DEFAULT_LOADING_TEXT);
        assert_eq!(settings.session.fallback_text, "The oracle is silent.");
    }

    #[test]
    fn oversized_or_non_finite_timeout_falls_back_to_default() {
        for value in ["1e30", "inf", "nan"] {
            let settings =
                DialogueSettings::parse(&format!("[session]\nresponse_timeout_secs = {value}"))
                    .expect("config parses");
            assert_eq!(
                settings.session.response_timeout,
                Some(Duration::from_secs(30)),
                "response_timeout_secs = {value}"
            );
        }
    }

    #[test]
    fn unknown_tie_break_is_rejected() {
        assert!(DialogueSettings::parse("[proximity]\ntie_break = \"random\"").is_err());
    }
}
