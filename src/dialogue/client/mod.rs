//! Conversation client contract and the HTTP-backed implementation.

pub mod config;
pub mod http;

pub use http::HttpConversationClient;

use bevy::prelude::Resource;

use super::types::{BackendReply, ChatRequest, RequestToken};

/// Contract every conversation backend must satisfy. Calls return
/// immediately; completions arrive later through [`ConversationClient::drain_replies`].
pub trait ConversationClient: Send + Sync {
    /// Human-readable backend description for logs.
    fn describe(&self) -> String;

    fn send(&self, token: RequestToken, request: ChatRequest);

    fn check_health(&self);

    fn reset_memory(&self);

    /// Completions that arrived since the previous call, in arrival order.
    fn drain_replies(&self) -> Vec<BackendReply>;
}

/// Resource wrapping the conversation client used by the dialogue systems.
#[derive(Resource)]
pub struct ActiveConversationClient {
    client: Box<dyn ConversationClient>,
}

impl ActiveConversationClient {
    pub fn new(client: Box<dyn ConversationClient>) -> Self {
        Self { client }
    }
}

impl std::ops::Deref for ActiveConversationClient {
    type Target = dyn ConversationClient;

    fn deref(&self) -> &Self::Target {
        self.client.as_ref()
    }
}
