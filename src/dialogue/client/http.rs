use std::thread;

use bevy::log::{debug, warn};
use crossbeam_channel::{unbounded, Receiver, Sender};
use reqwest::blocking::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};

use crate::dialogue::{
    errors::CommunicationError,
    types::{BackendReply, ChatRequest, ChatResponse, HealthResponse, RequestToken, ResetResponse},
};

use super::{
    config::{ApiConfig, ApiConfigError},
    ConversationClient,
};

/// Conversation client talking to the philosopher API over HTTP. Each call
/// runs on its own worker thread so the frame loop never blocks.
pub struct HttpConversationClient {
    mode: ClientMode,
    replies_tx: Sender<BackendReply>,
    replies_rx: Receiver<BackendReply>,
}

enum ClientMode {
    Live(LiveTransport),
    Unavailable { reason: String },
}

impl HttpConversationClient {
    pub fn new() -> Self {
        let mode = match ApiConfig::from_env().and_then(LiveTransport::new) {
            Ok(transport) => ClientMode::Live(transport),
            Err(err) => {
                warn!(
                    "Philosopher API client unavailable ({}). Conversations will show the fallback reply.",
                    err
                );
                ClientMode::Unavailable {
                    reason: err.to_string(),
                }
            }
        };
        Self::with_mode(mode)
    }

    fn with_mode(mode: ClientMode) -> Self {
        let (replies_tx, replies_rx) = unbounded();
        Self {
            mode,
            replies_tx,
            replies_rx,
        }
    }

    /// Runs `call` on a worker thread and forwards its reply. Without a live
    /// transport the failure is delivered straight away.
    fn spawn_call<F>(&self, name: String, call: F, unavailable: BackendReply)
    where
        F: FnOnce(&LiveTransport) -> BackendReply + Send + 'static,
    {
        let ClientMode::Live(transport) = &self.mode else {
            let _ = self.replies_tx.send(unavailable);
            return;
        };

        let transport = transport.clone();
        let replies = self.replies_tx.clone();
        let spawned = thread::Builder::new().name(name).spawn(move || {
            // A closed channel only means the app is shutting down.
            let _ = replies.send(call(&transport));
        });

        if let Err(err) = spawned {
            warn!(target: "dialogue", "Failed to spawn backend worker: {}", err);
            let _ = self.replies_tx.send(unavailable);
        }
    }

    fn unavailable_error(&self) -> CommunicationError {
        match &self.mode {
            ClientMode::Live(_) => CommunicationError::transport("failed to start backend worker"),
            ClientMode::Unavailable { reason } => CommunicationError::unavailable(reason.clone()),
        }
    }
}

impl Default for HttpConversationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationClient for HttpConversationClient {
    fn describe(&self) -> String {
        match &self.mode {
            ClientMode::Live(transport) => format!("http ({})", transport.config.base_url),
            ClientMode::Unavailable { reason } => format!("unavailable ({})", reason),
        }
    }

    fn send(&self, token: RequestToken, request: ChatRequest) {
        debug!(
            target: "dialogue",
            "Sending {} to {} ({} chars)",
            token,
            request.philosopher_id,
            request.message.chars().count()
        );
        let unavailable = BackendReply::Chat {
            token,
            result: Err(self.unavailable_error()),
        };
        self.spawn_call(
            format!("chat-{}", token.value()),
            move |transport| BackendReply::Chat {
                token,
                result: transport.chat(&request),
            },
            unavailable,
        );
    }

    fn check_health(&self) {
        let unavailable = BackendReply::Health(Err(self.unavailable_error()));
        self.spawn_call(
            "health-check".to_string(),
            |transport| BackendReply::Health(transport.health()),
            unavailable,
        );
    }

    fn reset_memory(&self) {
        let unavailable = BackendReply::MemoryReset(Err(self.unavailable_error()));
        self.spawn_call(
            "reset-memory".to_string(),
            |transport| BackendReply::MemoryReset(transport.reset_memory()),
            unavailable,
        );
    }

    fn drain_replies(&self) -> Vec<BackendReply> {
        self.replies_rx.try_iter().collect()
    }
}

#[derive(Clone)]
struct LiveTransport {
    http: Client,
    config: ApiConfig,
}

impl LiveTransport {
    fn new(config: ApiConfig) -> Result<Self, ApiConfigError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiConfigError::ClientBuild(err.to_string()))?;

        Ok(Self { http, config })
    }

    fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, CommunicationError> {
        let response = self
            .http
            .post(self.config.chat_url())
            .json(request)
            .send()
            .map_err(|err| self.map_transport_error(err))?;
        decode(response)
    }

    fn health(&self) -> Result<HealthResponse, CommunicationError> {
        let response = self
            .http
            .get(self.config.health_url())
            .send()
            .map_err(|err| self.map_transport_error(err))?;
        decode(response)
    }

    fn reset_memory(&self) -> Result<ResetResponse, CommunicationError> {
        let response = self
            .http
            .post(self.config.reset_memory_url())
            .send()
            .map_err(|err| self.map_transport_error(err))?;
        decode(response)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> CommunicationError {
        if err.is_timeout() {
            CommunicationError::Timeout {
                elapsed: self.config.timeout,
            }
        } else {
            CommunicationError::transport(err.to_string())
        }
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CommunicationError> {
    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<ApiErrorResponse>()
            .ok()
            .map(|body| body.detail);
        return Err(CommunicationError::Status {
            code: status.as_u16(),
            detail,
        });
    }

    response
        .json::<T>()
        .map_err(|err| CommunicationError::decode(err.to_string()))
}

/// FastAPI error body (`HTTPException`).
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    detail: String,
}
