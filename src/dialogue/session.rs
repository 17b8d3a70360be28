//! Dialogue session state machine.
//!
//! A session moves `Idle -> Composing -> Awaiting -> Displaying` and back to
//! `Composing` for follow-ups, or to `Idle` on cancel. At most one session is
//! open and at most one chat call is outstanding; replies carrying anything
//! other than the live [`RequestToken`] are discarded.
use std::time::Duration;

use crate::npc::components::ActorId;

use super::{
    errors::CommunicationError,
    settings::SessionSettings,
    types::{ChatRequest, ChatResponse, RequestToken, TokenGenerator},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogueMode {
    #[default]
    Idle,
    Composing,
    Awaiting,
    Displaying,
}

impl DialogueMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Composing => "composing",
            Self::Awaiting => "awaiting",
            Self::Displaying => "displaying",
        }
    }
}

/// The five input kinds the session understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueInput {
    Engage,
    Type(char),
    Backspace,
    Submit,
    Cancel,
}

/// Chat call the caller must hand to the conversation client.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub token: RequestToken,
    pub target: ActorId,
    pub request: ChatRequest,
}

/// Observable consequence of a session transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    Opened {
        target: ActorId,
    },
    Dispatched(OutgoingMessage),
    Resolved {
        token: RequestToken,
        target: ActorId,
        outcome: Result<String, CommunicationError>,
    },
    /// A reply for a token that is no longer live; nothing changed.
    Discarded {
        token: RequestToken,
    },
    Closed {
        target: ActorId,
        abandoned: Option<RequestToken>,
    },
}

#[derive(Debug)]
pub struct DialogueSession {
    mode: DialogueMode,
    buffer: String,
    target: Option<ActorId>,
    pending: Option<RequestToken>,
    awaiting_for: Duration,
    display_text: String,
    tokens: TokenGenerator,
    settings: SessionSettings,
}

impl DialogueSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            mode: DialogueMode::Idle,
            buffer: String::new(),
            target: None,
            pending: None,
            awaiting_for: Duration::ZERO,
            display_text: String::new(),
            tokens: TokenGenerator::default(),
            settings,
        }
    }

    pub fn mode(&self) -> DialogueMode {
        self.mode
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn target(&self) -> Option<&ActorId> {
        self.target.as_ref()
    }

    #[cfg_attr(not(any(test, feature = "core_debug")), allow(dead_code))]
    pub fn pending_token(&self) -> Option<RequestToken> {
        self.pending
    }

    /// The dialogue box is shown in every mode except `Idle`.
    pub fn is_visible(&self) -> bool {
        self.mode != DialogueMode::Idle
    }

    /// Text the dialogue box body should show for the current mode.
    pub fn rendered_text(&self) -> &str {
        match self.mode {
            DialogueMode::Idle => "",
            DialogueMode::Composing => &self.buffer,
            DialogueMode::Awaiting | DialogueMode::Displaying => &self.display_text,
        }
    }

    /// Applies one input. `in_range` is only consulted when opening a session,
    /// so the target never switches mid-conversation.
    pub fn handle(
        &mut self,
        input: DialogueInput,
        in_range: Option<&ActorId>,
    ) -> Option<SessionEffect> {
        match (self.mode, input) {
            (DialogueMode::Idle, DialogueInput::Engage) => self.open(in_range?.clone()),
            (DialogueMode::Idle, _) | (_, DialogueInput::Engage) => None,
            (_, DialogueInput::Cancel) => self.close(),
            (DialogueMode::Composing, DialogueInput::Type(ch)) => {
                self.push_char(ch);
                None
            }
            (DialogueMode::Composing, DialogueInput::Backspace) => {
                self.buffer.pop();
                None
            }
            (DialogueMode::Composing, DialogueInput::Submit) => self.submit(),
            (DialogueMode::Displaying, DialogueInput::Submit) => {
                self.buffer.clear();
                self.mode = DialogueMode::Composing;
                None
            }
            (DialogueMode::Awaiting, _) | (DialogueMode::Displaying, _) => None,
        }
    }

    /// Applies a chat completion. Only the live token changes state.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        result: Result<ChatResponse, CommunicationError>,
    ) -> SessionEffect {
        if self.mode != DialogueMode::Awaiting || self.pending != Some(token) {
            return SessionEffect::Discarded { token };
        }

        // Invariant: Awaiting always has a target.
        let target = self.target.clone().unwrap_or_else(ActorId::player);
        self.pending = None;
        self.awaiting_for = Duration::ZERO;
        self.mode = DialogueMode::Displaying;

        let outcome = result.map(|reply| reply.response);
        self.display_text = match &outcome {
            Ok(text) => text.clone(),
            Err(_) => self.settings.fallback_text.clone(),
        };

        SessionEffect::Resolved {
            token,
            target,
            outcome,
        }
    }

    /// Advances the response timeout while awaiting a reply.
    pub fn tick(&mut self, delta: Duration) -> Option<SessionEffect> {
        if self.mode != DialogueMode::Awaiting {
            return None;
        }

        self.awaiting_for += delta;
        let timeout = self.settings.response_timeout?;
        if self.awaiting_for < timeout {
            return None;
        }

        let token = self.pending?;
        let elapsed = self.awaiting_for;
        Some(self.resolve(token, Err(CommunicationError::Timeout { elapsed })))
    }

    fn open(&mut self, target: ActorId) -> Option<SessionEffect> {
        self.buffer.clear();
        self.display_text.clear();
        self.pending = None;
        self.target = Some(target.clone());
        self.mode = DialogueMode::Composing;
        Some(SessionEffect::Opened { target })
    }

    fn close(&mut self) -> Option<SessionEffect> {
        let target = self.target.take()?;
        let abandoned = self.pending.take();
        self.buffer.clear();
        self.display_text.clear();
        self.awaiting_for = Duration::ZERO;
        self.mode = DialogueMode::Idle;
        Some(SessionEffect::Closed { target, abandoned })
    }

    fn push_char(&mut self, ch: char) {
        if ch.is_control() || self.buffer.chars().count() >= self.settings.max_message_chars {
            return;
        }
        self.buffer.push(ch);
    }

    fn submit(&mut self) -> Option<SessionEffect> {
        let message = self.buffer.trim();
        if message.is_empty() {
            return None;
        }
        let message = message.to_string();
        let target = self.target.clone()?;

        let token = self.tokens.next_token();
        self.pending = Some(token);
        self.buffer.clear();
        self.awaiting_for = Duration::ZERO;
        self.display_text = self.settings.loading_text.clone();
        self.mode = DialogueMode::Awaiting;

        Some(SessionEffect::Dispatched(OutgoingMessage {
            token,
            request: ChatRequest {
                message,
                philosopher_id: target.to_string(),
            },
            target,
        }))
    }
}
