//! Request tokens and the backend's request/response shapes.
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::CommunicationError;

/// Identifies one outstanding chat call. A reply is applied only when its
/// token is still the session's live token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "REQ-{:05}", self.0)
    }
}

/// Issues monotonically increasing tokens, starting at 1.
#[derive(Debug, Default)]
pub struct TokenGenerator {
    last: u64,
}

impl TokenGenerator {
    pub fn next_token(&mut self) -> RequestToken {
        self.last += 1;
        RequestToken::new(self.last)
    }
}

/// `POST /chat` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub philosopher_id: String,
}

/// `POST /chat` reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// `GET /health` reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `POST /reset-memory` reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetResponse {
    pub status: String,
    pub message: String,
}

/// Completion delivered by a conversation client on a later tick.
#[derive(Debug, Clone)]
pub enum BackendReply {
    Chat {
        token: RequestToken,
        result: Result<ChatResponse, CommunicationError>,
    },
    Health(Result<HealthResponse, CommunicationError>),
    MemoryReset(Result<ResetResponse, CommunicationError>),
}
